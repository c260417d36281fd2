//! Externally reported task actuals.
//!
//! CSV columns: `Element_GlobalId`, `Task_Id`, `ActualStart`, `ActualFinish`,
//! `ScheduleStart`, `ScheduleFinish`. Site reports are messy: identifier
//! cells may carry a ` - <label>` suffix and dates arrive in two formats.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::warn;

use crate::error::InputError;

/// One validated actuals row.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualsRow {
    pub element_guid: String,
    pub task_guid: String,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_finish: Option<NaiveDateTime>,
    pub schedule_start: Option<NaiveDateTime>,
    pub schedule_finish: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
struct ActualsRecord {
    #[serde(rename = "Element_GlobalId")]
    element_guid: Option<String>,
    #[serde(rename = "Task_Id")]
    task_guid: Option<String>,
    #[serde(rename = "ActualStart", default)]
    actual_start: Option<String>,
    #[serde(rename = "ActualFinish", default)]
    actual_finish: Option<String>,
    #[serde(rename = "ScheduleStart", default)]
    schedule_start: Option<String>,
    #[serde(rename = "ScheduleFinish", default)]
    schedule_finish: Option<String>,
}

/// Strips a ` - <label>` suffix from an identifier cell.
fn bare_guid(cell: &str) -> String {
    cell.split(" - ").next().unwrap_or(cell).trim().to_string()
}

/// Parses a date with the primary ISO format, falling back to the
/// day-first site-report format.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%d-%m-%Y %H:%M").ok())
}

/// Reads the actuals table. Rows missing an identifier or carrying
/// unparseable dates are logged and skipped; they never abort the run.
pub fn read_actuals<P: AsRef<Path>>(path: P) -> Result<Vec<ActualsRow>, InputError> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).map_err(|source| InputError::FileOpen {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for (index, record) in reader.deserialize().enumerate() {
        let record: ActualsRecord = record?;

        let element_guid = record.element_guid.as_deref().map(bare_guid);
        let task_guid = record.task_guid.as_deref().map(bare_guid);
        let (element_guid, task_guid) = match (element_guid, task_guid) {
            (Some(e), Some(t)) if !e.is_empty() && !t.is_empty() => (e, t),
            _ => {
                warn!(row = index, "skipping row with missing identifiers");
                continue;
            }
        };

        // A present-but-unparseable date invalidates the whole row
        let mut row_ok = true;
        let mut date_field = |raw: &Option<String>, field: &str| {
            let raw = raw.as_deref().map(str::trim).unwrap_or_default();
            if raw.is_empty() {
                return None;
            }
            let parsed = parse_date(raw);
            if parsed.is_none() {
                warn!(row = index, field, value = %raw, "unparseable date, skipping row");
                row_ok = false;
            }
            parsed
        };

        let actual_start = date_field(&record.actual_start, "ActualStart");
        let actual_finish = date_field(&record.actual_finish, "ActualFinish");
        let schedule_start = date_field(&record.schedule_start, "ScheduleStart");
        let schedule_finish = date_field(&record.schedule_finish, "ScheduleFinish");
        if !row_ok {
            continue;
        }

        rows.push(ActualsRow {
            element_guid,
            task_guid,
            actual_start,
            actual_finish,
            schedule_start,
            schedule_finish,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_iso_and_fallback_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_date("2024-01-02T08:30:00"), Some(expected));
        assert_eq!(parse_date("02-01-2024 08:30"), Some(expected));
        assert_eq!(
            parse_date("2024-01-02"),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn strips_label_suffix_from_identifiers() {
        assert_eq!(bare_guid("abc123 - Wall-01"), "abc123");
        assert_eq!(bare_guid("abc123"), "abc123");
    }

    #[test]
    fn reads_rows_and_skips_incomplete_ones() {
        let file = write_csv(
            "Element_GlobalId,Task_Id,ActualStart,ActualFinish,ScheduleStart,ScheduleFinish\n\
             elem1 - Wall,task1 - Pouring,2024-01-01T00:00:00,2024-01-11T00:00:00,,\n\
             ,task2,2024-01-01T00:00:00,,,\n\
             elem3,task3,garbage,,,\n",
        );
        let rows = read_actuals(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].element_guid, "elem1");
        assert_eq!(rows[0].task_guid, "task1");
        assert!(rows[0].actual_finish.is_some());
        assert!(rows[0].schedule_start.is_none());
    }
}
