//! Cost report: task-by-task cost breakdown across the whole model.

use crate::error::ExportError;
use crate::model::Project;
use std::fs::File;
use std::path::Path;

/// One line of the cost report. Elements are identified by GUID, the one
/// column stable across model revisions.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub element_guid: String,
    pub task_name: String,
    pub task_guid: String,
    /// Empty for tasks without any priced quantity.
    pub quantity_type: String,
    pub quantity_value: f64,
    pub total_cost: f64,
}

/// Collects the cost breakdown: one row per (task, linked quantity), plus a
/// zero row for every task with nothing priced against it.
///
/// Cost items without a quantity record contribute no row of their own; a
/// task whose only items are quantity-less still gets the zero row.
#[must_use]
pub fn collect_report(project: &Project) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for (element_guid, task_guids) in &project.task_assignments {
        let Some(element) = project.elements.get(element_guid) else {
            continue;
        };
        for task_guid in task_guids {
            let Some(task) = project.tasks.get(task_guid) else {
                continue;
            };

            let mut priced_any = false;
            for item in project.cost_items_for_task(task_guid) {
                let Some(quantity) = item.quantity else {
                    continue;
                };
                rows.push(ReportRow {
                    element_guid: element.guid.clone(),
                    task_name: task.name.clone(),
                    task_guid: task.guid.clone(),
                    quantity_type: quantity.kind().label().to_string(),
                    quantity_value: quantity.value(),
                    total_cost: item.cost_of(quantity),
                });
                priced_any = true;
            }

            if !priced_any {
                rows.push(ReportRow {
                    element_guid: element.guid.clone(),
                    task_name: task.name.clone(),
                    task_guid: task.guid.clone(),
                    quantity_type: String::new(),
                    quantity_value: 0.0,
                    total_cost: 0.0,
                });
            }
        }
    }

    rows
}

/// Writes the cost report to CSV.
pub fn export_report<P: AsRef<Path>>(project: &Project, path: P) -> Result<(), ExportError> {
    let rows = collect_report(project);

    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([
        "Element",
        "Task",
        "TaskID",
        "QuantityType",
        "QuantityValue",
        "TotalCost",
    ])?;

    for row in &rows {
        writer.write_record([
            &row.element_guid,
            &row.task_name,
            &row.task_guid,
            &row.quantity_type,
            &row.quantity_value.to_string(),
            &row.total_cost.to_string(),
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
    use crate::model::{Element, ElementKind, Quantity};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn element(guid: &str, name: &str) -> Element {
        Element {
            guid: guid.to_string(),
            name: name.to_string(),
            ifc_class: "IfcWall".to_string(),
            kind: ElementKind::Wall,
            storey: None,
            bottom_elevation: 0.0,
            top_elevation: 0.0,
            quantity_sets: HashMap::new(),
            property_sets: HashMap::new(),
        }
    }

    #[test]
    fn priced_tasks_get_one_row_per_linked_quantity() {
        let mut project = Project::new("P".to_string(), "IFC4".to_string());
        project.add_element(element("w1", "Wall A"));
        let task = project.create_task("Concrete Pouring", "w1");
        let item =
            project.create_cost_item("Concrete", "A.100", 50.0, Some(Quantity::Volume(10.0)), "w1");
        project.link_cost_to_task(&task, &item);

        let rows = collect_report(&project);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].element_guid, "w1");
        assert_eq!(rows[0].quantity_type, "Volume");
        assert_eq!(rows[0].quantity_value, 10.0);
        assert_eq!(rows[0].total_cost, 500.0);
    }

    #[test]
    fn items_on_one_element_are_never_merged() {
        let mut project = Project::new("P".to_string(), "IFC4".to_string());
        project.add_element(element("w1", "Wall A"));
        let pouring = project.create_task("Concrete Pouring", "w1");
        let formwork = project.create_task("Formwork Installation", "w1");
        let volume_item =
            project.create_cost_item("Concrete", "A.100", 50.0, Some(Quantity::Volume(10.0)), "w1");
        let area_item =
            project.create_cost_item("Formwork", "B.200", 20.0, Some(Quantity::Area(5.0)), "w1");
        project.link_cost_to_task(&pouring, &volume_item);
        project.link_cost_to_task(&formwork, &area_item);

        let rows = collect_report(&project);
        assert_eq!(rows.len(), 2);
        let costs: Vec<f64> = rows.iter().map(|r| r.total_cost).collect();
        assert_eq!(costs, vec![500.0, 100.0]);
    }

    #[test]
    fn unpriced_tasks_get_a_single_zero_row() {
        let mut project = Project::new("P".to_string(), "IFC4".to_string());
        project.add_element(element("w1", "Wall A"));
        project.create_task("Rebar Installation", "w1");

        let rows = collect_report(&project);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_type, "");
        assert_eq!(rows[0].total_cost, 0.0);
    }

    #[test]
    fn quantity_less_items_only_yield_the_zero_row() {
        let mut project = Project::new("P".to_string(), "IFC4".to_string());
        project.add_element(element("w1", "Wall A"));
        let task = project.create_task("Rebar Installation", "w1");
        let item = project.create_cost_item("Rebar", "R.300", 1.2, None, "w1");
        project.link_cost_to_task(&task, &item);

        let rows = collect_report(&project);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_type, "");
        assert_eq!(rows[0].total_cost, 0.0);
    }

    #[test]
    fn weight_quantities_are_priced_when_linked() {
        let mut project = Project::new("P".to_string(), "IFC4".to_string());
        project.add_element(element("w1", "Wall A"));
        let task = project.create_task("Rebar Installation", "w1");
        let item =
            project.create_cost_item("Rebar", "R.300", 1.2, Some(Quantity::Weight(500.0)), "w1");
        project.link_cost_to_task(&task, &item);

        let rows = collect_report(&project);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_type, "Weight");
        assert_eq!(rows[0].total_cost, 600.0);
    }

    #[test]
    fn writes_csv_with_headers() {
        let mut project = Project::new("P".to_string(), "IFC4".to_string());
        project.add_element(element("w1", "Wall A"));
        let task = project.create_task("Concrete Pouring", "w1");
        let item =
            project.create_cost_item("Concrete", "A.100", 50.0, Some(Quantity::Volume(2.0)), "w1");
        project.link_cost_to_task(&task, &item);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        export_report(&project, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Element,Task,TaskID,QuantityType,QuantityValue,TotalCost"
        );
        // The Element column carries the GUID, not the display name
        assert!(lines.next().unwrap().starts_with("w1,Concrete Pouring,"));
    }
}
