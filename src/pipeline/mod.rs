pub mod actuals;
pub mod assign;
pub mod costing;
pub mod linking;
pub mod sequencing;

pub use actuals::{update_actuals, CompletionRow};
pub use assign::assign_tasks;
pub use costing::{build_cost_items, match_cost_codes};
pub use linking::link_costs;
pub use sequencing::{sequence_and_estimate, ScheduleRow};
