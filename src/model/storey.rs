use serde::{Deserialize, Serialize};

/// A building storey with its reference elevation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storey {
    pub guid: String,
    pub name: String,
    pub elevation: f64,
}
