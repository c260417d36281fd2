use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{CostItem, Element, Quantity, Storey, Task};
use crate::guid;

/// The working model the pipeline stages read and rewrite.
///
/// Entities live in GUID-keyed tables and refer to each other through the
/// relation tables below, never through back-pointers. Assignment vectors
/// keep creation order, which makes every downstream traversal reproducible
/// for the same document.
#[derive(Debug, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub schema: String,
    /// Name of the work schedule, set by the task-assignment stage.
    pub work_schedule: Option<String>,
    /// Name of the cost schedule, set by the cost-item stage.
    pub cost_schedule: Option<String>,

    pub storeys: BTreeMap<String, Storey>,
    pub elements: BTreeMap<String, Element>,
    pub tasks: BTreeMap<String, Task>,
    pub cost_items: BTreeMap<String, CostItem>,

    /// element GUID -> task GUIDs assigned to it, in creation order.
    pub task_assignments: BTreeMap<String, Vec<String>>,
    /// element GUID -> cost item GUIDs controlled by it, in creation order.
    pub cost_assignments: BTreeMap<String, Vec<String>>,
    /// (task GUID, cost item GUID) funding links; the set rejects duplicates.
    pub task_cost_links: BTreeSet<(String, String)>,
    /// Finish-to-start edges (predecessor GUID, successor GUID) forming the
    /// generated chain.
    pub sequence_edges: Vec<(String, String)>,
}

impl Project {
    #[must_use]
    pub fn new(name: String, schema: String) -> Self {
        Self {
            name,
            schema,
            work_schedule: None,
            cost_schedule: None,
            storeys: BTreeMap::new(),
            elements: BTreeMap::new(),
            tasks: BTreeMap::new(),
            cost_items: BTreeMap::new(),
            task_assignments: BTreeMap::new(),
            cost_assignments: BTreeMap::new(),
            task_cost_links: BTreeSet::new(),
            sequence_edges: Vec::new(),
        }
    }

    pub fn add_storey(&mut self, storey: Storey) {
        self.storeys.insert(storey.guid.clone(), storey);
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.insert(element.guid.clone(), element);
    }

    /// Elements whose IFC class matches `ifc_entity` (case-insensitive),
    /// including subtype matches within the known structural kinds, e.g.
    /// `IfcWall` also selects standard-case walls.
    #[must_use]
    pub fn elements_of_class(&self, ifc_entity: &str) -> Vec<String> {
        use super::ElementKind;
        let wanted = ifc_entity.trim().to_ascii_uppercase();
        let wanted_kind = ElementKind::from_ifc_class(&wanted);
        self.elements
            .values()
            .filter(|e| {
                e.ifc_class.to_ascii_uppercase() == wanted
                    || (wanted_kind != ElementKind::Other && e.kind == wanted_kind)
            })
            .map(|e| e.guid.clone())
            .collect()
    }

    /// Creates a task and assigns it to an element. Returns the new GUID.
    pub fn create_task(&mut self, name: &str, element_guid: &str) -> String {
        let task_guid = guid::new_guid();
        self.tasks
            .insert(task_guid.clone(), Task::new(task_guid.clone(), name));
        self.task_assignments
            .entry(element_guid.to_string())
            .or_default()
            .push(task_guid.clone());
        task_guid
    }

    /// Tasks assigned to an element, in creation order.
    #[must_use]
    pub fn tasks_for_element(&self, element_guid: &str) -> Vec<&Task> {
        self.task_assignments
            .get(element_guid)
            .map(|guids| {
                guids
                    .iter()
                    .filter_map(|guid| self.tasks.get(guid))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Creates a cost item and assigns it to an element via the
    /// control-assignment relation. Returns the new GUID.
    pub fn create_cost_item(
        &mut self,
        name: &str,
        identification: &str,
        applied_value: f64,
        quantity: Option<Quantity>,
        element_guid: &str,
    ) -> String {
        let item_guid = guid::new_guid();
        self.cost_items.insert(
            item_guid.clone(),
            CostItem {
                guid: item_guid.clone(),
                name: name.to_string(),
                identification: identification.to_string(),
                applied_value,
                quantity,
            },
        );
        self.cost_assignments
            .entry(element_guid.to_string())
            .or_default()
            .push(item_guid.clone());
        item_guid
    }

    /// Cost items assigned to an element, in creation order.
    #[must_use]
    pub fn cost_items_for_element(&self, element_guid: &str) -> Vec<&CostItem> {
        self.cost_assignments
            .get(element_guid)
            .map(|guids| {
                guids
                    .iter()
                    .filter_map(|guid| self.cost_items.get(guid))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether a funding link already exists.
    #[must_use]
    pub fn is_cost_linked_to_task(&self, task_guid: &str, cost_item_guid: &str) -> bool {
        self.task_cost_links
            .contains(&(task_guid.to_string(), cost_item_guid.to_string()))
    }

    /// Links a cost item to a task. Returns false if the link already
    /// existed, so linking stays idempotent.
    pub fn link_cost_to_task(&mut self, task_guid: &str, cost_item_guid: &str) -> bool {
        self.task_cost_links
            .insert((task_guid.to_string(), cost_item_guid.to_string()))
    }

    /// Cost items linked to a task, in GUID order.
    #[must_use]
    pub fn cost_items_for_task(&self, task_guid: &str) -> Vec<&CostItem> {
        self.task_cost_links
            .iter()
            .filter(|(task, _)| task == task_guid)
            .filter_map(|(_, item)| self.cost_items.get(item))
            .collect()
    }

    pub fn add_sequence_edge(&mut self, predecessor: &str, successor: &str) {
        self.sequence_edges
            .push((predecessor.to_string(), successor.to_string()));
    }
}
