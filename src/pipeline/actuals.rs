//! Progress reconciliation: merges reported actual dates into the schedule
//! and computes completion percentages.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::inputs::ActualsRow;
use crate::model::Project;

/// One row of the completion export.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRow {
    pub element_guid: String,
    pub task_guid: String,
    /// Planned duration in days, taken from the report row's schedule dates.
    /// Zero when the task is already finished or the dates are missing.
    pub schedule_duration_days: i64,
    pub actual_duration_days: i64,
    pub completion_percentage: f64,
}

/// Applies actuals to the project's tasks.
///
/// Rows referencing an element or task GUID absent from the model are
/// logged and skipped. A finished task (both dates reported) is 100%
/// complete; a started task's completion is its elapsed share of the
/// planned duration relative to `now`, or 0% when the planned duration is
/// unknown or zero. Tasks with only a reported finish get the date stored
/// but produce no completion row.
///
/// Returns the completion rows in input order.
pub fn update_actuals(
    project: &mut Project,
    rows: &[ActualsRow],
    now: NaiveDateTime,
) -> Vec<CompletionRow> {
    let mut completions = Vec::new();

    for row in rows {
        if !project.elements.contains_key(&row.element_guid) {
            warn!(element = %row.element_guid, "element not found, skipping row");
            continue;
        }
        let Some(task) = project.tasks.get_mut(&row.task_guid) else {
            warn!(task = %row.task_guid, "task not found, skipping row");
            continue;
        };

        let time = task.time_mut();
        if row.actual_start.is_some() {
            time.actual_start = row.actual_start;
        }
        if row.actual_finish.is_some() {
            time.actual_finish = row.actual_finish;
        }

        let Some(actual_start) = row.actual_start else {
            continue;
        };

        let mut schedule_duration_days = 0;
        let (actual_duration_days, completion_percentage) = match row.actual_finish {
            Some(actual_finish) => ((actual_finish - actual_start).num_days(), 100.0),
            None => {
                let elapsed = (now - actual_start).num_days();
                if let (Some(start), Some(finish)) = (row.schedule_start, row.schedule_finish) {
                    schedule_duration_days = (finish - start).num_days();
                }
                let completion = if schedule_duration_days > 0 {
                    (elapsed as f64 / schedule_duration_days as f64) * 100.0
                } else {
                    0.0
                };
                (elapsed, completion)
            }
        };

        time.actual_duration_days = Some(actual_duration_days);
        time.completion = Some(completion_percentage);

        completions.push(CompletionRow {
            element_guid: row.element_guid.clone(),
            task_guid: row.task_guid.clone(),
            schedule_duration_days,
            actual_duration_days,
            completion_percentage,
        });
    }

    info!(rows = completions.len(), "actuals reconciled");
    completions
}
