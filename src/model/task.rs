use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::cost::QuantityKind;

/// The fixed vocabulary of schedulable work, with its canonical task names.
///
/// Task names in the model remain free-form strings (they come from the WBS
/// table), but every place that used to compare name literals goes through
/// this enum instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    #[serde(rename = "Formwork Installation")]
    FormworkInstallation,
    #[serde(rename = "Rebar Installation")]
    RebarInstallation,
    #[serde(rename = "Concrete Pouring")]
    ConcretePouring,
}

impl TaskKind {
    /// The canonical task name as it appears in the WBS table.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FormworkInstallation => "Formwork Installation",
            Self::RebarInstallation => "Rebar Installation",
            Self::ConcretePouring => "Concrete Pouring",
        }
    }

    /// Reverse lookup from a task's name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "Formwork Installation" => Some(Self::FormworkInstallation),
            "Rebar Installation" => Some(Self::RebarInstallation),
            "Concrete Pouring" => Some(Self::ConcretePouring),
            _ => None,
        }
    }

    /// Which task a cost item's quantity kind funds.
    ///
    /// Weight deliberately maps to no task: the source workflow defines a
    /// rebar productivity rate but never auto-links weight quantities, and
    /// that gap is preserved here rather than guessed at.
    #[must_use]
    pub fn for_quantity(kind: QuantityKind) -> Option<Self> {
        match kind {
            QuantityKind::Volume => Some(Self::ConcretePouring),
            QuantityKind::Area => Some(Self::FormworkInstallation),
            QuantityKind::Weight => None,
        }
    }
}

/// Schedule and progress data attached to a task, mirroring IfcTaskTime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskTime {
    pub schedule_start: Option<NaiveDateTime>,
    pub schedule_finish: Option<NaiveDateTime>,
    /// Estimated duration in hours, before any display flooring.
    pub schedule_duration_hours: Option<f64>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_finish: Option<NaiveDateTime>,
    pub actual_duration_days: Option<i64>,
    /// Completion percentage, 0-100.
    pub completion: Option<f64>,
}

/// A unit of scheduled work, created once per (element, task name) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub guid: String,
    pub name: String,
    pub time: Option<TaskTime>,
}

impl Task {
    #[must_use]
    pub fn new(guid: String, name: impl Into<String>) -> Self {
        Self {
            guid,
            name: name.into(),
            time: None,
        }
    }

    /// The task time record, created on first use.
    pub fn time_mut(&mut self) -> &mut TaskTime {
        self.time.get_or_insert_with(TaskTime::default)
    }
}

/// Formats an hour count as an ISO-8601 duration the way the schedule
/// exports it: truncated whole hours, with a zero estimate displayed as
/// a one-hour placeholder.
#[must_use]
pub fn iso_duration_hours(hours: f64) -> String {
    if hours > 0.0 {
        format!("PT{}H", hours as i64)
    } else {
        "PT1H".to_string()
    }
}
