//! Task-cost linking: connects each cost item to the task its quantity
//! kind funds, on the same element.

use tracing::{debug, info, warn};

use crate::model::{Project, TaskKind};

/// Links every assigned cost item to the matching task on its element.
///
/// The quantity kind decides the target task name (volume funds concrete
/// pouring, area funds formwork installation); the link is only created when
/// a task of that name is already assigned to the element. Linking is
/// idempotent: running the stage twice yields the same link set.
///
/// Returns the number of links created.
pub fn link_costs(project: &mut Project) -> usize {
    let mut pending: Vec<(String, String)> = Vec::new();

    for (element_guid, item_guids) in &project.cost_assignments {
        for item_guid in item_guids {
            let Some(item) = project.cost_items.get(item_guid) else {
                continue;
            };
            let Some(quantity) = item.quantity else {
                debug!(item = %item_guid, "no quantity on cost item, nothing to link");
                continue;
            };
            let Some(target) = TaskKind::for_quantity(quantity.kind()) else {
                debug!(item = %item_guid, "quantity kind has no funded task");
                continue;
            };

            let task_guid = project
                .tasks_for_element(element_guid)
                .iter()
                .find(|task| task.name == target.name())
                .map(|task| task.guid.clone());

            match task_guid {
                Some(task_guid) => pending.push((task_guid, item_guid.clone())),
                None => {
                    warn!(
                        element = %element_guid,
                        task = target.name(),
                        "task not found for element, cost item left unlinked"
                    );
                }
            }
        }
    }

    let mut created = 0;
    for (task_guid, item_guid) in pending {
        if project.link_cost_to_task(&task_guid, &item_guid) {
            created += 1;
        } else {
            debug!(task = %task_guid, item = %item_guid, "already linked");
        }
    }

    info!(created, "task-cost links created");
    created
}
