//! The work-breakdown-structure task table.
//!
//! CSV columns: `IfcEntity`, `Parent`, `Task Name`. The `Parent` column is a
//! dotted WBS identifier; rows whose identifier has fewer than two dots are
//! grouping rows, and only leaf rows become assignable tasks.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::InputError;

/// One assignable task rule: create a task named `task_name` for every
/// element of the row's IFC entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRule {
    /// The dotted WBS identifier of the row.
    pub wbs_id: String,
    pub task_name: String,
}

#[derive(Debug, Deserialize)]
struct TaskRecord {
    #[serde(rename = "IfcEntity")]
    ifc_entity: Option<String>,
    #[serde(rename = "Parent")]
    parent: String,
    #[serde(rename = "Task Name")]
    task_name: String,
}

/// Whether a WBS identifier denotes a grouping row rather than a leaf task.
fn is_grouping_row(wbs_id: &str) -> bool {
    wbs_id.matches('.').count() < 2
}

/// Reads the task table and groups leaf rules by IFC entity type.
///
/// Grouping rows and rows without an entity type are skipped. The map keeps
/// entity types in alphabetical order and rules in file order, so task
/// creation order is reproducible.
pub fn read_task_table<P: AsRef<Path>>(
    path: P,
) -> Result<BTreeMap<String, Vec<TaskRule>>, InputError> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).map_err(|source| InputError::FileOpen {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let mut rules: BTreeMap<String, Vec<TaskRule>> = BTreeMap::new();

    for record in reader.deserialize() {
        let record: TaskRecord = record?;
        let entity = match record.ifc_entity.as_deref().map(str::trim) {
            Some(entity) if !entity.is_empty() => entity.to_string(),
            _ => continue,
        };
        if is_grouping_row(&record.parent) {
            debug!(wbs_id = %record.parent, "skipping grouping row");
            continue;
        }
        rules.entry(entity).or_default().push(TaskRule {
            wbs_id: record.parent,
            task_name: record.task_name,
        });
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const TABLE: &str = "\
IfcEntity,Parent,Task Name
,1,Structural Works
,1.1,Substructure
IfcFooting,1.1.1,Formwork Installation
IfcFooting,1.1.2,Concrete Pouring
IfcWall,1.2.1,Formwork Installation
IfcWall,1.2.2,Rebar Installation
IfcWall,1.2.3,Concrete Pouring
";

    fn write_table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn leaf_heuristic_counts_dots() {
        assert!(is_grouping_row("1"));
        assert!(is_grouping_row("1.1"));
        assert!(!is_grouping_row("1.1.1"));
        assert!(!is_grouping_row("1.2.3.4"));
    }

    #[test]
    fn groups_leaf_rules_by_entity() {
        let file = write_table(TABLE);
        let rules = read_task_table(file.path()).unwrap();

        assert_eq!(rules.len(), 2);
        let wall_tasks: Vec<&str> = rules["IfcWall"]
            .iter()
            .map(|r| r.task_name.as_str())
            .collect();
        assert_eq!(
            wall_tasks,
            vec![
                "Formwork Installation",
                "Rebar Installation",
                "Concrete Pouring"
            ]
        );
        assert_eq!(rules["IfcFooting"].len(), 2);
    }

    #[test]
    fn rows_without_entity_are_skipped() {
        let file = write_table("IfcEntity,Parent,Task Name\n ,1.1.1,Orphan Task\n");
        let rules = read_task_table(file.path()).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn entity_names_are_trimmed() {
        let file = write_table("IfcEntity,Parent,Task Name\n IfcSlab ,2.1.1,Concrete Pouring\n");
        let rules = read_task_table(file.path()).unwrap();
        assert!(rules.contains_key("IfcSlab"));
    }
}
