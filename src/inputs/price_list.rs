//! The external price list.
//!
//! CSV columns: `Code`, `Description`, `Unit of measurement`, and a price
//! column headed either `Price / Prezzo` (the bilingual original) or plain
//! `Price`.

use std::fs::File;
use std::path::Path;
use tracing::warn;

use crate::error::InputError;

/// One price-list record, read-only reference data.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceListEntry {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub price: f64,
}

const CODE: &str = "Code";
const DESCRIPTION: &str = "Description";
const UNIT: &str = "Unit of measurement";
const PRICE_HEADERS: &[&str] = &["Price / Prezzo", "Price"];

/// Reads the price list. Rows with an unparseable price are logged and
/// skipped; a missing required column is an error.
pub fn read_price_list<P: AsRef<Path>>(path: P) -> Result<Vec<PriceListEntry>, InputError> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).map_err(|source| InputError::FileOpen {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let missing = |name: &str| InputError::MissingColumn {
        column: name.to_string(),
        path: path_ref.to_path_buf(),
    };

    let code_idx = column(CODE).ok_or_else(|| missing(CODE))?;
    let description_idx = column(DESCRIPTION).ok_or_else(|| missing(DESCRIPTION))?;
    let unit_idx = column(UNIT).ok_or_else(|| missing(UNIT))?;
    let price_idx = PRICE_HEADERS
        .iter()
        .find_map(|name| column(name))
        .ok_or_else(|| missing(PRICE_HEADERS[0]))?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let code = record.get(code_idx).unwrap_or_default().trim().to_string();
        if code.is_empty() {
            continue;
        }
        let raw_price = record.get(price_idx).unwrap_or_default().trim();
        let Ok(price) = raw_price.parse::<f64>() else {
            warn!(code = %code, price = %raw_price, "unparseable price, skipping row");
            continue;
        };
        entries.push(PriceListEntry {
            code,
            description: record
                .get(description_idx)
                .unwrap_or_default()
                .trim()
                .to_string(),
            unit: record.get(unit_idx).unwrap_or_default().trim().to_string(),
            price,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_the_bilingual_price_header() {
        let file = write_csv(
            "Code,Description,Unit of measurement,Price / Prezzo\n\
             A.100,Concrete C25/30,m3,50.0\n\
             B.200,Formwork panels,m2,20.0\n",
        );
        let entries = read_price_list(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "A.100");
        assert_eq!(entries[0].unit, "m3");
        assert_eq!(entries[0].price, 50.0);
    }

    #[test]
    fn falls_back_to_plain_price_header() {
        let file = write_csv("Code,Description,Unit of measurement,Price\nA.100,Concrete,m3,45.5\n");
        let entries = read_price_list(file.path()).unwrap();
        assert_eq!(entries[0].price, 45.5);
    }

    #[test]
    fn missing_code_column_is_an_error() {
        let file = write_csv("Description,Unit of measurement,Price\nConcrete,m3,45.5\n");
        assert!(matches!(
            read_price_list(file.path()),
            Err(InputError::MissingColumn { .. })
        ));
    }

    #[test]
    fn unparseable_price_skips_the_row() {
        let file = write_csv(
            "Code,Description,Unit of measurement,Price\n\
             A.100,Concrete,m3,fifty\n\
             B.200,Formwork,m2,20.0\n",
        );
        let entries = read_price_list(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "B.200");
    }
}
