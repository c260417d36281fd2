use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of building-element classes relevant to construction sequencing.
///
/// Anything outside the known structural classes maps to [`ElementKind::Other`]
/// and sorts last in the sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Footing,
    Beam,
    Column,
    Wall,
    Slab,
    Other,
}

impl ElementKind {
    /// Maps an IFC class name (any casing) to its kind.
    #[must_use]
    pub fn from_ifc_class(class: &str) -> Self {
        match class.trim().to_ascii_uppercase().as_str() {
            "IFCFOOTING" => Self::Footing,
            "IFCBEAM" => Self::Beam,
            "IFCCOLUMN" => Self::Column,
            "IFCWALL" | "IFCWALLSTANDARDCASE" => Self::Wall,
            "IFCSLAB" => Self::Slab,
            _ => Self::Other,
        }
    }

    /// Construction precedence within a storey. Beams are erected before
    /// columns in the precast workflow this table models.
    #[must_use]
    pub fn sequence_rank(self) -> u32 {
        match self {
            Self::Footing => 1,
            Self::Beam => 2,
            Self::Column => 3,
            Self::Wall => 4,
            Self::Slab => 5,
            Self::Other => 999,
        }
    }
}

/// A physical building component. Read-only for the pipeline: elements come
/// from the imported model and are never created or mutated by a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub guid: String,
    pub name: String,
    /// IFC class in its canonical form, e.g. `IfcWall`.
    pub ifc_class: String,
    pub kind: ElementKind,
    /// GUID of the containing storey, if spatially contained.
    pub storey: Option<String>,
    /// Bottom elevation of the local placement, relative to the storey.
    pub bottom_elevation: f64,
    /// Bottom elevation plus the bounding-box height.
    pub top_elevation: f64,
    /// Quantity sets: set name -> quantity name -> value.
    pub quantity_sets: HashMap<String, HashMap<String, f64>>,
    /// Property sets: set name -> property name -> value.
    pub property_sets: HashMap<String, HashMap<String, String>>,
}

/// Property set holding the bill-of-labor cost codes.
pub const COST_CODES_PSET: &str = "Cost_Codes";

/// Prefix of property names that carry a cost code value.
pub const COST_CODE_PREFIX: &str = "BOL.Code";

impl Element {
    /// Name of the base-quantity set by the `Qto_<Class>BaseQuantities`
    /// convention, derived from the element's IFC class.
    #[must_use]
    pub fn base_quantity_set_name(&self) -> String {
        let class = self
            .ifc_class
            .strip_prefix("Ifc")
            .unwrap_or(&self.ifc_class);
        format!("Qto_{class}BaseQuantities")
    }

    /// Net volume from the base quantities, if present.
    #[must_use]
    pub fn net_volume(&self) -> Option<f64> {
        self.base_quantity("NetVolume")
    }

    /// Outer surface area from the base quantities, if present.
    #[must_use]
    pub fn outer_surface_area(&self) -> Option<f64> {
        self.base_quantity("OuterSurfaceArea")
    }

    fn base_quantity(&self, name: &str) -> Option<f64> {
        self.quantity_sets
            .get(&self.base_quantity_set_name())
            .and_then(|set| set.get(name))
            .copied()
    }

    /// Cost code values from the `Cost_Codes` property set, in property-name
    /// order so repeated runs see the same sequence.
    #[must_use]
    pub fn cost_codes(&self) -> Vec<String> {
        let Some(pset) = self.property_sets.get(COST_CODES_PSET) else {
            return Vec::new();
        };
        let mut named: Vec<(&String, &String)> = pset
            .iter()
            .filter(|(name, _)| name.starts_with(COST_CODE_PREFIX))
            .collect();
        named.sort_by(|a, b| a.0.cmp(b.0));
        named.into_iter().map(|(_, value)| value.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wall_with_quantities() -> Element {
        let mut quantity_sets = HashMap::new();
        let mut base = HashMap::new();
        base.insert("NetVolume".to_string(), 12.5);
        base.insert("OuterSurfaceArea".to_string(), 40.0);
        quantity_sets.insert("Qto_WallBaseQuantities".to_string(), base);

        Element {
            guid: "wallguid".to_string(),
            name: "Wall-01".to_string(),
            ifc_class: "IfcWall".to_string(),
            kind: ElementKind::Wall,
            storey: None,
            bottom_elevation: 0.0,
            top_elevation: 3.0,
            quantity_sets,
            property_sets: HashMap::new(),
        }
    }

    #[test]
    fn kind_from_class_is_case_insensitive() {
        assert_eq!(ElementKind::from_ifc_class("IfcWall"), ElementKind::Wall);
        assert_eq!(ElementKind::from_ifc_class("IFCWALL"), ElementKind::Wall);
        assert_eq!(
            ElementKind::from_ifc_class("IfcWallStandardCase"),
            ElementKind::Wall
        );
        assert_eq!(ElementKind::from_ifc_class("IfcDoor"), ElementKind::Other);
    }

    #[test]
    fn sequence_rank_orders_structural_work() {
        assert!(ElementKind::Footing.sequence_rank() < ElementKind::Beam.sequence_rank());
        assert!(ElementKind::Beam.sequence_rank() < ElementKind::Column.sequence_rank());
        assert_eq!(ElementKind::Other.sequence_rank(), 999);
    }

    #[test]
    fn base_quantities_follow_naming_convention() {
        let wall = wall_with_quantities();
        assert_eq!(wall.base_quantity_set_name(), "Qto_WallBaseQuantities");
        assert_eq!(wall.net_volume(), Some(12.5));
        assert_eq!(wall.outer_surface_area(), Some(40.0));
    }

    #[test]
    fn missing_quantity_set_yields_none() {
        let mut wall = wall_with_quantities();
        wall.quantity_sets.clear();
        assert_eq!(wall.net_volume(), None);
        assert_eq!(wall.outer_surface_area(), None);
    }

    #[test]
    fn cost_codes_filter_and_sort_by_property_name() {
        let mut wall = wall_with_quantities();
        let mut pset = HashMap::new();
        pset.insert("BOL.Code2".to_string(), "B.200".to_string());
        pset.insert("BOL.Code1".to_string(), "A.100".to_string());
        pset.insert("Comment".to_string(), "ignore me".to_string());
        wall.property_sets.insert(COST_CODES_PSET.to_string(), pset);

        assert_eq!(wall.cost_codes(), vec!["A.100", "B.200"]);
    }

    #[test]
    fn elements_without_cost_codes_yield_empty() {
        let wall = wall_with_quantities();
        assert!(wall.cost_codes().is_empty());
    }
}
