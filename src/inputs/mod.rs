pub mod actuals;
pub mod price_list;
pub mod task_table;

pub use crate::error::InputError;
pub use actuals::{read_actuals, ActualsRow};
pub use price_list::{read_price_list, PriceListEntry};
pub use task_table::{read_task_table, TaskRule};
