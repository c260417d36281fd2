//! Construction sequencing and duration estimation.
//!
//! Orders every assigned task into one global finish-to-start chain by
//! spatial position (storey elevation, element bottom elevation, element
//! kind precedence), then walks the chain with a single running clock,
//! estimating each task's duration from its linked quantity takeoffs.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::config::ProductivityTable;
use crate::model::{iso_duration_hours, Project};

/// One row of the planned-schedule export.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub element_guid: String,
    pub element_name: String,
    pub element_type: String,
    pub storey_guid: String,
    pub storey_name: String,
    pub task_guid: String,
    pub task_name: String,
    pub schedule_start: NaiveDateTime,
    pub schedule_finish: NaiveDateTime,
    /// ISO-8601 duration as displayed, after the zero-hour floor.
    pub schedule_duration: String,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_finish: Option<NaiveDateTime>,
}

/// A task positioned for sorting.
struct SequenceEntry {
    storey_elevation: f64,
    combined_bottom: f64,
    rank: u32,
    storey_guid: String,
    element_guid: String,
    task_guid: String,
}

/// Sequences all tasks and assigns start/finish times.
///
/// The chain is rebuilt from scratch: existing sequence edges are replaced.
/// The first task starts at `start`; every subsequent task starts when its
/// predecessor finishes, strictly serially. The sort is stable over total
/// float ordering, so the same document always yields the same chain.
///
/// Returns the planned-schedule rows in chain order.
pub fn sequence_and_estimate(
    project: &mut Project,
    rates: &ProductivityTable,
    start: NaiveDateTime,
) -> Vec<ScheduleRow> {
    let mut entries: Vec<SequenceEntry> = Vec::new();

    for element in project.elements.values() {
        let Some(storey_guid) = element.storey.as_ref() else {
            debug!(element = %element.guid, "element outside any storey, not sequenced");
            continue;
        };
        let Some(storey) = project.storeys.get(storey_guid) else {
            continue;
        };
        for task in project.tasks_for_element(&element.guid) {
            entries.push(SequenceEntry {
                storey_elevation: storey.elevation,
                combined_bottom: storey.elevation + element.bottom_elevation,
                rank: element.kind.sequence_rank(),
                storey_guid: storey_guid.clone(),
                element_guid: element.guid.clone(),
                task_guid: task.guid.clone(),
            });
        }
    }

    entries.sort_by(|a, b| {
        a.storey_elevation
            .total_cmp(&b.storey_elevation)
            .then(a.combined_bottom.total_cmp(&b.combined_bottom))
            .then(a.rank.cmp(&b.rank))
    });

    project.sequence_edges.clear();
    for pair in entries.windows(2) {
        project.add_sequence_edge(&pair[0].task_guid, &pair[1].task_guid);
    }

    let mut rows = Vec::with_capacity(entries.len());
    let mut clock = start;

    for entry in &entries {
        let hours = estimate_task_hours(project, &entry.task_guid, rates);
        let finish = clock + hours_to_duration(hours);

        let (element_name, element_type) = {
            let element = &project.elements[&entry.element_guid];
            (element.name.clone(), element.ifc_class.clone())
        };
        let storey_name = project.storeys[&entry.storey_guid].name.clone();

        let (task_name, actual_start, actual_finish) = {
            let Some(task) = project.tasks.get_mut(&entry.task_guid) else {
                continue;
            };
            let time = task.time_mut();
            time.schedule_start = Some(clock);
            time.schedule_finish = Some(finish);
            time.schedule_duration_hours = Some(hours);
            let (actual_start, actual_finish) = (time.actual_start, time.actual_finish);
            (task.name.clone(), actual_start, actual_finish)
        };

        rows.push(ScheduleRow {
            element_guid: entry.element_guid.clone(),
            element_name,
            element_type,
            storey_guid: entry.storey_guid.clone(),
            storey_name,
            task_guid: entry.task_guid.clone(),
            task_name,
            schedule_start: clock,
            schedule_finish: finish,
            schedule_duration: iso_duration_hours(hours),
            actual_start,
            actual_finish,
        });

        clock = finish;
    }

    info!(
        tasks = rows.len(),
        edges = project.sequence_edges.len(),
        "sequence chain built"
    );
    rows
}

/// Estimated hours for a task: the sum of (takeoff / rate) over its linked
/// cost items whose quantity kind matches the task's configured rate.
/// Tasks without a rate or without matching quantities estimate to zero.
#[must_use]
pub fn estimate_task_hours(project: &Project, task_guid: &str, rates: &ProductivityTable) -> f64 {
    let Some(task) = project.tasks.get(task_guid) else {
        return 0.0;
    };
    let Some(rate) = rates.rate_for_task_name(&task.name) else {
        return 0.0;
    };

    project
        .cost_items_for_task(task_guid)
        .iter()
        .filter_map(|item| item.quantity)
        .filter(|quantity| quantity.kind() == rate.quantity)
        .map(|quantity| quantity.value() / rate.units_per_hour)
        .sum()
}

fn hours_to_duration(hours: f64) -> Duration {
    Duration::seconds((hours * 3600.0).round() as i64)
}
