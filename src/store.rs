//! Project document persistence.
//!
//! Each pipeline stage loads a project document, mutates it in memory and
//! writes a new document; the JSON file is the durable hand-off between
//! stages. Saving writes a temporary file in the destination directory and
//! renames it over the target, so a failed or interrupted save leaves the
//! existing document untouched.

use std::io::Write;
use std::path::Path;

use crate::error::StoreError;
use crate::model::Project;

/// Loads a project document from a JSON file.
pub fn load_project<P: AsRef<Path>>(path: P) -> Result<Project, StoreError> {
    let path_ref = path.as_ref();
    let content = std::fs::read_to_string(path_ref).map_err(|source| StoreError::FileRead {
        path: path_ref.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Saves a project document as pretty-printed JSON.
///
/// The write is atomic with respect to the destination: the JSON goes to a
/// temporary file next to it, which replaces the target only once fully
/// written.
pub fn save_project<P: AsRef<Path>>(project: &Project, path: P) -> Result<(), StoreError> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(project)?;

    let dir = match path_ref.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file =
        tempfile::NamedTempFile::new_in(dir).map_err(|source| StoreError::FileCreate {
            path: path_ref.to_path_buf(),
            source,
        })?;

    file.write_all(json.as_bytes())
        .map_err(|e| StoreError::WriteError {
            message: e.to_string(),
        })?;

    file.persist(path_ref).map_err(|e| StoreError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
