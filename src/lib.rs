//! # IFC Scheduler
//!
//! A 4D/5D BIM pipeline: imports structural elements from IFC files and
//! carries them through task assignment, cost estimation, task-cost linking,
//! construction sequencing, duration estimation, progress reconciliation and
//! report export.
//!
//! The stages are independent batch commands. A JSON project document is the
//! hand-off between them: every stage loads it, rewrites its own slice of
//! the model and saves it back.
//!
//! ## Example
//!
//! ```no_run
//! use ifc_scheduler::parser::import_ifc_file;
//!
//! let project = import_ifc_file("model.ifc").expect("Failed to import");
//! println!("Project: {}", project.name);
//! println!("Elements: {}", project.elements.len());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod guid;
pub mod inputs;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod store;
