use serde::{Deserialize, Serialize};

/// The kind of physical measurement a quantity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Volume,
    Area,
    Weight,
}

impl QuantityKind {
    /// Label used in report output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::Area => "Area",
            Self::Weight => "Weight",
        }
    }
}

/// A typed quantity takeoff: volume in m³, area in m², weight in kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quantity {
    Volume(f64),
    Area(f64),
    Weight(f64),
}

impl Quantity {
    #[must_use]
    pub fn kind(self) -> QuantityKind {
        match self {
            Self::Volume(_) => QuantityKind::Volume,
            Self::Area(_) => QuantityKind::Area,
            Self::Weight(_) => QuantityKind::Weight,
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Volume(v) | Self::Area(v) | Self::Weight(v) => v,
        }
    }
}

/// A priced line item from the cost schedule.
///
/// Carries at most one quantity record; items built from an unrecognized
/// unit symbol keep `quantity: None` and price nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostItem {
    pub guid: String,
    /// Description from the matched price list entry.
    pub name: String,
    /// The cost code this item was matched on.
    pub identification: String,
    /// Unit price in the price list's currency.
    pub applied_value: f64,
    pub quantity: Option<Quantity>,
}

impl CostItem {
    /// Total cost of one quantity at this item's unit price.
    #[must_use]
    pub fn cost_of(&self, quantity: Quantity) -> f64 {
        quantity.value() * self.applied_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quantity_exposes_kind_and_value() {
        assert_eq!(Quantity::Volume(10.0).kind(), QuantityKind::Volume);
        assert_eq!(Quantity::Area(5.0).kind(), QuantityKind::Area);
        assert_eq!(Quantity::Weight(250.0).value(), 250.0);
    }

    #[test]
    fn cost_is_value_times_unit_price() {
        let item = CostItem {
            guid: "g".to_string(),
            name: "Concrete C25/30".to_string(),
            identification: "A.100".to_string(),
            applied_value: 50.0,
            quantity: Some(Quantity::Volume(10.0)),
        };
        assert_eq!(item.cost_of(Quantity::Volume(10.0)), 500.0);
    }
}
