use crate::error::ParseError;
use crate::model::{Element, ElementKind, Project, Storey};
use crate::parser::step::{StepEntity, StepFile, StepValue};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// The building-element classes the pipeline schedules, with their canonical
/// class names for the quantity-set naming convention.
const BUILDING_ELEMENTS: &[(&str, &str)] = &[
    ("IFCFOOTING", "IfcFooting"),
    ("IFCBEAM", "IfcBeam"),
    ("IFCCOLUMN", "IfcColumn"),
    ("IFCWALL", "IfcWall"),
    ("IFCWALLSTANDARDCASE", "IfcWallStandardCase"),
    ("IFCSLAB", "IfcSlab"),
];

/// Imports an IFC file into the initial project document.
///
/// Extracts storeys with elevations, the structural building elements,
/// spatial containment, base-quantity sets, ordinary property sets (the
/// `Cost_Codes` set in particular) and each element's bottom/top elevation
/// from its placement and bounding box. Missing placement or quantity data
/// degrades to defaults, never to an error.
///
/// # Errors
///
/// Returns [`ParseError::FileRead`] if the file cannot be read.
/// Returns [`ParseError::InvalidStep`] if the STEP format is malformed.
pub fn import_ifc_file<P: AsRef<Path>>(path: P) -> Result<Project, ParseError> {
    let content = std::fs::read_to_string(&path).map_err(|source| ParseError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    let step_file = StepFile::parse(&content)?;
    let mut project = Project::new(extract_project_name(&step_file), step_file.schema.clone());

    // Storeys, keyed by instance id until elements resolve their containment
    let mut storey_guids: HashMap<u64, String> = HashMap::new();
    for entity in step_file.entities_of("IFCBUILDINGSTOREY") {
        let guid = entity.string_at(0).unwrap_or_default().to_string();
        let storey = Storey {
            guid: guid.clone(),
            name: entity
                .string_at(2)
                .map_or_else(|| format!("Storey #{}", entity.id), ToString::to_string),
            elevation: entity.real_at(9).unwrap_or(0.0),
        };
        storey_guids.insert(entity.id, guid);
        project.add_storey(storey);
    }

    let element_to_storey = extract_spatial_containment(&step_file);
    let quantity_sets = extract_quantity_sets(&step_file);
    let property_sets = extract_property_sets(&step_file);

    for (step_type, canonical_class) in BUILDING_ELEMENTS {
        for entity in step_file.entities_of(step_type) {
            let guid = entity.string_at(0).unwrap_or_default().to_string();
            let (bottom, top) = extract_elevations(&step_file, entity);
            let element = Element {
                guid,
                name: entity
                    .string_at(2)
                    .map_or_else(|| format!("Element #{}", entity.id), ToString::to_string),
                ifc_class: (*canonical_class).to_string(),
                kind: ElementKind::from_ifc_class(canonical_class),
                storey: element_to_storey
                    .get(&entity.id)
                    .and_then(|storey_id| storey_guids.get(storey_id))
                    .cloned(),
                bottom_elevation: bottom,
                top_elevation: top,
                quantity_sets: quantity_sets.get(&entity.id).cloned().unwrap_or_default(),
                property_sets: property_sets.get(&entity.id).cloned().unwrap_or_default(),
            };
            debug!(
                guid = %element.guid,
                class = %element.ifc_class,
                "imported element"
            );
            project.add_element(element);
        }
    }

    Ok(project)
}

fn extract_project_name(step_file: &StepFile) -> String {
    step_file
        .entities_of("IFCPROJECT")
        .first()
        .and_then(|e| e.string_at(2))
        .unwrap_or("Unknown Project")
        .to_string()
}

/// Element instance id -> storey instance id, from
/// IFCRELCONTAINEDINSPATIALSTRUCTURE (RelatedElements at 4, RelatingStructure
/// at 5).
fn extract_spatial_containment(step_file: &StepFile) -> HashMap<u64, u64> {
    let mut element_to_storey = HashMap::new();

    for rel in step_file.entities_of("IFCRELCONTAINEDINSPATIALSTRUCTURE") {
        if let Some(storey_id) = rel.reference_at(5) {
            for element_id in rel.references_at(4) {
                element_to_storey.insert(element_id, storey_id);
            }
        }
    }

    element_to_storey
}

/// Element instance id -> quantity set name -> quantity name -> value, from
/// IFCELEMENTQUANTITY definitions related through IFCRELDEFINESBYPROPERTIES.
fn extract_quantity_sets(step_file: &StepFile) -> HashMap<u64, HashMap<String, HashMap<String, f64>>> {
    // Quantity set instance id -> (set name, quantities)
    let mut sets: HashMap<u64, (String, HashMap<String, f64>)> = HashMap::new();

    for qset in step_file.entities_of("IFCELEMENTQUANTITY") {
        let set_name = qset.string_at(2).unwrap_or_default().to_string();
        let mut quantities = HashMap::new();

        for quantity_id in qset.references_at(5) {
            let Some(quantity) = step_file.entity(quantity_id) else {
                continue;
            };
            // Physical quantities carry their value at index 3
            let (Some(name), Some(value)) = (quantity.string_at(0), quantity.real_at(3)) else {
                continue;
            };
            match quantity.entity_type.as_str() {
                "IFCQUANTITYVOLUME" | "IFCQUANTITYAREA" | "IFCQUANTITYWEIGHT"
                | "IFCQUANTITYLENGTH" | "IFCQUANTITYCOUNT" => {
                    quantities.insert(name.to_string(), value);
                }
                _ => {}
            }
        }

        sets.insert(qset.id, (set_name, quantities));
    }

    relate_definitions(step_file, &sets)
}

/// Element instance id -> property set name -> property name -> value, from
/// IFCPROPERTYSET definitions related through IFCRELDEFINESBYPROPERTIES.
fn extract_property_sets(
    step_file: &StepFile,
) -> HashMap<u64, HashMap<String, HashMap<String, String>>> {
    let mut sets: HashMap<u64, (String, HashMap<String, String>)> = HashMap::new();

    for pset in step_file.entities_of("IFCPROPERTYSET") {
        let set_name = pset.string_at(2).unwrap_or_default().to_string();
        let mut props = HashMap::new();

        for prop_id in pset.references_at(4) {
            let Some(prop) = step_file.entity(prop_id) else {
                continue;
            };
            if prop.entity_type != "IFCPROPERTYSINGLEVALUE" {
                continue;
            }
            // NominalValue at 2, usually inside a typed wrapper
            if let (Some(name), Some(value)) = (prop.string_at(0), prop.string_at(2)) {
                props.insert(name.to_string(), value.to_string());
            }
        }

        sets.insert(pset.id, (set_name, props));
    }

    relate_definitions(step_file, &sets)
}

/// Resolves IFCRELDEFINESBYPROPERTIES (RelatedObjects at 4, RelatingPropertyDefinition
/// at 5) against a table of definition instances.
fn relate_definitions<V: Clone>(
    step_file: &StepFile,
    definitions: &HashMap<u64, (String, V)>,
) -> HashMap<u64, HashMap<String, V>> {
    let mut by_element: HashMap<u64, HashMap<String, V>> = HashMap::new();

    for rel in step_file.entities_of("IFCRELDEFINESBYPROPERTIES") {
        let Some(definition_id) = rel.reference_at(5) else {
            continue;
        };
        let Some((set_name, values)) = definitions.get(&definition_id) else {
            continue;
        };
        for element_id in rel.references_at(4) {
            by_element
                .entry(element_id)
                .or_default()
                .insert(set_name.clone(), values.clone());
        }
    }

    by_element
}

/// Bottom and top elevation of an element, local to its storey.
///
/// Bottom comes from the Z coordinate of the object placement's location;
/// top adds the ZDim of the first bounding box in the shape representation.
/// Anything missing along the walk degrades to 0.0.
fn extract_elevations(step_file: &StepFile, element: &StepEntity) -> (f64, f64) {
    let bottom = placement_z(step_file, element).unwrap_or(0.0);
    let height = bounding_box_height(step_file, element).unwrap_or(0.0);
    (bottom, bottom + height)
}

fn placement_z(step_file: &StepFile, element: &StepEntity) -> Option<f64> {
    // ObjectPlacement at 5 -> IFCLOCALPLACEMENT.RelativePlacement at 1
    // -> IFCAXIS2PLACEMENT3D.Location at 0 -> IFCCARTESIANPOINT.Coordinates
    let placement = step_file.entity(element.reference_at(5)?)?;
    let axis = step_file.entity(placement.reference_at(1)?)?;
    let point = step_file.entity(axis.reference_at(0)?)?;
    match point.values.first() {
        Some(StepValue::List(coords)) => match coords.get(2) {
            Some(StepValue::Real(z)) => Some(*z),
            Some(StepValue::Integer(z)) => Some(*z as f64),
            _ => None,
        },
        _ => None,
    }
}

fn bounding_box_height(step_file: &StepFile, element: &StepEntity) -> Option<f64> {
    // Representation at 6 -> IFCPRODUCTDEFINITIONSHAPE.Representations at 2
    let shape = step_file.entity(element.reference_at(6)?)?;
    for representation_id in shape.references_at(2) {
        let Some(representation) = step_file.entity(representation_id) else {
            continue;
        };
        // IFCSHAPEREPRESENTATION.Items at 3
        for item_id in representation.references_at(3) {
            if let Some(item) = step_file.entity(item_id) {
                if item.entity_type == "IFCBOUNDINGBOX" {
                    // Corner, XDim, YDim, ZDim
                    return item.real_at(3);
                }
            }
        }
    }
    None
}
