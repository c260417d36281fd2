pub mod completion;
pub mod report;
pub mod schedule;

pub use crate::error::ExportError;
pub use completion::export_completion;
pub use report::{collect_report, export_report, ReportRow};
pub use schedule::export_schedule;
