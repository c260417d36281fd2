pub mod ifc;
pub mod step;

pub use crate::error::ParseError;
pub use ifc::import_ifc_file;
pub use step::{StepEntity, StepFile, StepValue};
