use crate::error::ExportError;
use crate::pipeline::CompletionRow;
use std::fs::File;
use std::path::Path;

/// Writes the completion report to CSV, one row per reconciled task.
pub fn export_completion<P: AsRef<Path>>(
    rows: &[CompletionRow],
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([
        "Element_GlobalId",
        "Task_Id",
        "ScheduleDuration",
        "ActualDuration",
        "CompletionPercentage",
    ])?;

    for row in rows {
        writer.write_record([
            &row.element_guid,
            &row.task_guid,
            &row.schedule_duration_days.to_string(),
            &row.actual_duration_days.to_string(),
            &format!("{:.1}", row.completion_percentage),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
