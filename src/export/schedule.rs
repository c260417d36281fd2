use crate::error::ExportError;
use crate::pipeline::ScheduleRow;
use chrono::NaiveDateTime;
use std::fs::File;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_date(value: Option<NaiveDateTime>) -> String {
    value
        .map(|v| v.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Writes the planned schedule to CSV, one row per sequenced task in chain
/// order.
pub fn export_schedule<P: AsRef<Path>>(rows: &[ScheduleRow], path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([
        "Element_GlobalId",
        "Element_Name",
        "Element_Type",
        "Building_Story_GlobalId",
        "Building_Story_Name",
        "Task_Id",
        "Task_Name",
        "ScheduledStart",
        "ScheduledFinish",
        "ScheduleDuration",
        "ActualStart",
        "ActualFinish",
    ])?;

    for row in rows {
        writer.write_record([
            &row.element_guid,
            &row.element_name,
            &row.element_type,
            &row.storey_guid,
            &row.storey_name,
            &row.task_guid,
            &row.task_name,
            &row.schedule_start.format(DATE_FORMAT).to_string(),
            &row.schedule_finish.format(DATE_FORMAT).to_string(),
            &row.schedule_duration,
            &format_date(row.actual_start),
            &format_date(row.actual_finish),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_headers_and_formats_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let rows = vec![ScheduleRow {
            element_guid: "w1".to_string(),
            element_name: "Wall".to_string(),
            element_type: "IfcWall".to_string(),
            storey_guid: "s1".to_string(),
            storey_name: "Ground".to_string(),
            task_guid: "t1".to_string(),
            task_name: "Concrete Pouring".to_string(),
            schedule_start: start,
            schedule_finish: start + chrono::Duration::hours(10),
            schedule_duration: "PT10H".to_string(),
            actual_start: None,
            actual_finish: None,
        }];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.csv");
        export_schedule(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("Element_GlobalId,"));
        assert_eq!(
            lines.next().unwrap(),
            "w1,Wall,IfcWall,s1,Ground,t1,Concrete Pouring,\
             2024-03-04T08:00:00,2024-03-04T18:00:00,PT10H,,"
        );
    }
}
