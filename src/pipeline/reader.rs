//! Classifier result CSV reading.
//!
//! Uses the `csv` crate for robust parsing: UTF-8 BOM, quoted fields
//! with embedded commas and escaped quotes are all handled.

use std::path::Path;

use crate::constants::REQUIRED_COLUMNS;
use crate::error::{Error, Result};
use crate::store::RawDetection;

/// Read a classifier result CSV into raw detection rows.
///
/// The header is validated before any row is returned: a file lacking
/// any of the required columns fails with the missing names listed, so
/// callers can abort before writing anything.
///
/// Field values are returned as trimmed text; normalization is the
/// importer's concern.
pub fn read_result_file(path: &Path) -> Result<Vec<RawDetection>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::ResultRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = reader
        .headers()
        .map_err(|e| Error::ResultRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| (*required).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    // Presence of every required column was checked above.
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let idx_start = column(REQUIRED_COLUMNS[0]);
    let idx_end = column(REQUIRED_COLUMNS[1]);
    let idx_scientific = column(REQUIRED_COLUMNS[2]);
    let idx_common = column(REQUIRED_COLUMNS[3]);
    let idx_confidence = column(REQUIRED_COLUMNS[4]);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::ResultRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        rows.push(RawDetection {
            start: field(idx_start),
            end: field(idx_end),
            scientific_name: field(idx_scientific),
            common_name: field(idx_common),
            confidence: field(idx_confidence),
        });
    }

    Ok(rows)
}
