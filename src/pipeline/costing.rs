//! Cost estimation: matches element cost codes against the price list and
//! builds cost items with their quantity takeoffs.

use tracing::{info, warn};

use crate::inputs::PriceListEntry;
use crate::model::{Element, Project, Quantity};

/// Price-list entries matching an element's cost codes.
///
/// Codes are compared by exact, whitespace-trimmed equality. Every code is
/// looked up independently and all matches are retained; a code without a
/// match is logged and dropped, never an error.
#[must_use]
pub fn match_cost_codes<'a>(
    element: &Element,
    price_list: &'a [PriceListEntry],
) -> Vec<&'a PriceListEntry> {
    let mut matches = Vec::new();
    for code in element.cost_codes() {
        let trimmed = code.trim();
        match price_list.iter().find(|entry| entry.code == trimmed) {
            Some(entry) => matches.push(entry),
            None => {
                warn!(element = %element.guid, code = %trimmed, "cost code not in price list");
            }
        }
    }
    matches
}

/// Quantity for a cost item according to the price entry's unit symbol:
/// `m3` takes the element's net volume, `m2` its outer surface area.
fn quantity_for_unit(element: &Element, unit: &str) -> Option<Quantity> {
    match unit.trim() {
        "m3" => element.net_volume().map(Quantity::Volume),
        "m2" => element.outer_surface_area().map(Quantity::Area),
        _ => None,
    }
}

/// Builds cost items for every (element, matched price entry) pair and
/// records the cost schedule name.
///
/// An unrecognized unit symbol or a missing takeoff still creates the item,
/// just without a quantity record; the estimator and report then price
/// nothing for it.
///
/// Returns the number of cost items created.
pub fn build_cost_items(
    project: &mut Project,
    price_list: &[PriceListEntry],
    schedule_name: &str,
) -> usize {
    project.cost_schedule = Some(schedule_name.to_string());
    let element_guids: Vec<String> = project.elements.keys().cloned().collect();
    let mut created = 0;

    for element_guid in element_guids {
        let element = &project.elements[&element_guid];
        let matches: Vec<PriceListEntry> = match_cost_codes(element, price_list)
            .into_iter()
            .cloned()
            .collect();

        for entry in matches {
            let quantity = quantity_for_unit(&project.elements[&element_guid], &entry.unit);
            if quantity.is_none() {
                warn!(
                    element = %element_guid,
                    code = %entry.code,
                    unit = %entry.unit,
                    "unknown unit or missing takeoff, cost item created without quantity"
                );
            }
            project.create_cost_item(
                &entry.description,
                &entry.code,
                entry.price,
                quantity,
                &element_guid,
            );
            created += 1;
        }
    }

    info!(created, "cost items built");
    created
}
