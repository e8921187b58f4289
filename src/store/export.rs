//! CSV export of stored detections.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants::confidence::DECIMAL_PLACES;
use crate::error::{Error, Result};
use crate::utils::csv::escape_csv;

use super::{DetectionFilter, DetectionStore};

/// Export header: classifier output columns plus store context.
const EXPORT_HEADER: &str =
    "Start (s),End (s),Scientific name,Common name,Confidence,Audio File,Session,Model";

impl DetectionStore {
    /// Export detections, optionally restricted to one session, to a
    /// CSV file with human-readable headers.
    ///
    /// Returns the number of rows written. Any mid-write failure is
    /// reported as an error with no guarantee about partial contents.
    pub fn export_csv(&self, path: &Path, session_id: Option<i64>) -> Result<usize> {
        let detections = self.get_detections(&DetectionFilter {
            session_id,
            ..DetectionFilter::default()
        })?;

        let file = File::create(path).map_err(|e| Error::ExportWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{EXPORT_HEADER}").map_err(|e| Error::ExportWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        for d in &detections {
            writeln!(
                writer,
                "{:.1},{:.1},{},{},{:.decimal$},{},{},{}",
                d.start_time,
                d.end_time,
                escape_csv(&d.scientific_name),
                escape_csv(&d.common_name),
                d.confidence,
                escape_csv(&d.filename),
                escape_csv(&d.session_name),
                escape_csv(&d.model_name),
                decimal = DECIMAL_PLACES,
            )
            .map_err(|e| Error::ExportWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        writer.flush().map_err(|e| Error::ExportWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(detections.len())
    }
}
