//! Task assignment: populates the work schedule from the WBS task table.

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::inputs::TaskRule;
use crate::model::Project;

/// Creates one task per (element, task name) pair for every element whose
/// IFC class matches a rule key, and records the work schedule name.
///
/// Deliberately not deduplicated per type: ten walls with three wall tasks
/// yield thirty task objects, each assigned to its own element.
///
/// Returns the number of tasks created.
pub fn assign_tasks(
    project: &mut Project,
    rules: &BTreeMap<String, Vec<TaskRule>>,
    schedule_name: &str,
) -> usize {
    project.work_schedule = Some(schedule_name.to_string());
    let mut created = 0;

    for (ifc_entity, task_rules) in rules {
        let element_guids = project.elements_of_class(ifc_entity);
        if element_guids.is_empty() {
            warn!(entity = %ifc_entity, "no elements of this type in the model");
            continue;
        }
        info!(
            entity = %ifc_entity,
            elements = element_guids.len(),
            tasks = task_rules.len(),
            "assigning tasks"
        );

        for element_guid in &element_guids {
            for rule in task_rules {
                project.create_task(&rule.task_name, element_guid);
                created += 1;
            }
        }
    }

    created
}
