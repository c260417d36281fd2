pub mod cost;
pub mod element;
pub mod project;
pub mod storey;
pub mod task;

pub use cost::{CostItem, Quantity, QuantityKind};
pub use element::{Element, ElementKind, COST_CODES_PSET, COST_CODE_PREFIX};
pub use project::Project;
pub use storey::Storey;
pub use task::{iso_duration_hours, Task, TaskKind, TaskTime};
