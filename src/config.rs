//! Productivity-rate configuration.
//!
//! The duration estimator divides quantity takeoffs by these rates. They are
//! injected configuration rather than constants scattered through the
//! pipeline: the defaults match the crew productivity the source workflow
//! assumed, and a JSON file can override them per project.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::model::{QuantityKind, TaskKind};

/// One productivity entry: how many quantity units a crew completes per hour,
/// and which quantity kind the rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductivityRate {
    pub units_per_hour: f64,
    pub quantity: QuantityKind,
}

/// Rates keyed by task kind. JSON keys are the canonical task names, e.g.
///
/// ```json
/// { "Concrete Pouring": { "units_per_hour": 0.3, "quantity": "Volume" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductivityTable {
    rates: HashMap<TaskKind, ProductivityRate>,
}

impl Default for ProductivityTable {
    fn default() -> Self {
        let mut rates = HashMap::new();
        rates.insert(
            TaskKind::FormworkInstallation,
            ProductivityRate {
                units_per_hour: 0.8,
                quantity: QuantityKind::Area,
            },
        );
        rates.insert(
            TaskKind::RebarInstallation,
            ProductivityRate {
                units_per_hour: 20.0,
                quantity: QuantityKind::Weight,
            },
        );
        rates.insert(
            TaskKind::ConcretePouring,
            ProductivityRate {
                units_per_hour: 0.3,
                quantity: QuantityKind::Volume,
            },
        );
        Self { rates }
    }
}

impl ProductivityTable {
    /// Loads rates from a JSON file and validates them.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let content =
            std::fs::read_to_string(path_ref).map_err(|source| ConfigError::FileRead {
                path: path_ref.to_path_buf(),
                source,
            })?;
        let table: Self = serde_json::from_str(&content)?;
        table.validate()?;
        Ok(table)
    }

    /// Rejects rates that would make the duration formula divide by zero or
    /// produce nonsense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, rate) in &self.rates {
            if !rate.units_per_hour.is_finite() || rate.units_per_hour <= 0.0 {
                return Err(ConfigError::InvalidRate {
                    task: kind.name().to_string(),
                    rate: rate.units_per_hour,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn rate_for(&self, kind: TaskKind) -> Option<ProductivityRate> {
        self.rates.get(&kind).copied()
    }

    /// Rate lookup by task name, for tasks whose name is in the canonical
    /// vocabulary. Unknown names have no rate and estimate to zero hours.
    #[must_use]
    pub fn rate_for_task_name(&self, name: &str) -> Option<ProductivityRate> {
        TaskKind::from_name(name).and_then(|kind| self.rate_for(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_assumed_crew_rates() {
        let table = ProductivityTable::default();
        let pouring = table.rate_for(TaskKind::ConcretePouring).unwrap();
        assert_eq!(pouring.units_per_hour, 0.3);
        assert_eq!(pouring.quantity, QuantityKind::Volume);

        let formwork = table.rate_for_task_name("Formwork Installation").unwrap();
        assert_eq!(formwork.units_per_hour, 0.8);
        assert_eq!(formwork.quantity, QuantityKind::Area);

        assert!(table.validate().is_ok());
    }

    #[test]
    fn unknown_task_name_has_no_rate() {
        let table = ProductivityTable::default();
        assert!(table.rate_for_task_name("Painting").is_none());
    }

    #[test]
    fn validation_rejects_non_positive_rates() {
        let json = r#"{ "Concrete Pouring": { "units_per_hour": 0.0, "quantity": "Volume" } }"#;
        let table: ProductivityTable = serde_json::from_str(json).unwrap();
        assert!(matches!(
            table.validate(),
            Err(ConfigError::InvalidRate { .. })
        ));
    }

    #[test]
    fn json_keys_are_canonical_task_names() {
        let json = r#"{ "Rebar Installation": { "units_per_hour": 25.0, "quantity": "Weight" } }"#;
        let table: ProductivityTable = serde_json::from_str(json).unwrap();
        let rebar = table.rate_for(TaskKind::RebarInstallation).unwrap();
        assert_eq!(rebar.units_per_hour, 25.0);
    }
}
