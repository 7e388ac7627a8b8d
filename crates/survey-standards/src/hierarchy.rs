//! Location hierarchy tables.
//!
//! A CSV with a `fine,coarse` header, one row per containment, e.g.
//!
//! ```text
//! fine,coarse
//! langata,nairobi
//! kilome,makueni
//! ```
//!
//! Values are scheme match values. A fine value may appear on several rows
//! when it straddles a boundary.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use survey_model::LocationHierarchy;

use crate::error::StandardsError;

pub fn load_location_hierarchy(path: &Path) -> Result<LocationHierarchy, StandardsError> {
    let file = std::fs::File::open(path).map_err(|e| StandardsError::io(path, e))?;
    parse_location_hierarchy(path, file)
}

pub fn parse_location_hierarchy<R: Read>(
    path: &Path,
    reader: R,
) -> Result<LocationHierarchy, StandardsError> {
    let csv_error = |message: String| StandardsError::Csv {
        path: path.to_path_buf(),
        message,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_matches('\u{feff}').eq_ignore_ascii_case(name))
            .ok_or_else(|| csv_error(format!("missing column '{name}'")))
    };
    let fine_idx = column("fine")?;
    let coarse_idx = column("coarse")?;

    let mut hierarchy = LocationHierarchy::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(e.to_string()))?;
        let fine = record.get(fine_idx).unwrap_or("");
        let coarse = record.get(coarse_idx).unwrap_or("");
        if fine.is_empty() || coarse.is_empty() {
            return Err(csv_error(format!("row {} has an empty value", line + 2)));
        }
        hierarchy.insert(fine, coarse);
    }
    Ok(hierarchy)
}
