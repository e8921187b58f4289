//! Detection-quality evaluation against hand-labeled ground truth.
//!
//! For each classifier result file and each configured species, builds
//! a per-second truth timeline and a per-second confidence timeline,
//! compares them at a fixed threshold and emits one metrics row per
//! (file, species) pair.

mod metrics;
mod timeline;

pub use metrics::{ThresholdMetrics, threshold_metrics};
pub use timeline::{prediction_timeline, truth_timeline};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{RESULTS_CSV_SUFFIX, eval::PREPROCESS_MARKERS};
use crate::error::{Error, Result};
use crate::pipeline::{collect_result_files, read_result_file};
use crate::utils::csv::escape_csv;
use crate::utils::time::parse_time_to_seconds;

/// Inputs for an evaluation run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Directory holding classifier result CSVs.
    pub results_dir: PathBuf,
    /// Ground-truth CSV file.
    pub ground_truth: PathBuf,
    /// Metrics CSV to write.
    pub output: PathBuf,
    /// Threshold override; configured default when unset.
    pub threshold: Option<f32>,
}

/// One labeled interval from the ground-truth file.
#[derive(Debug, Clone)]
pub struct GroundTruthRow {
    /// Recording path or basename as labeled.
    pub path: String,
    /// Interval start in seconds.
    pub start_seconds: f64,
    /// Interval end in seconds.
    pub end_seconds: f64,
    /// Species label.
    pub species: String,
}

/// One metrics row per (file, species) pair.
#[derive(Debug, Clone)]
pub struct MetricsRow {
    /// Result file basename.
    pub file_name: String,
    /// Species label.
    pub species: String,
    /// F1 score at the threshold.
    pub f1: f32,
    /// Precision at the threshold.
    pub precision: f32,
    /// Recall at the threshold.
    pub recall: f32,
}

/// Read the ground-truth CSV.
///
/// Required columns: `path`, `start_time`, `end_time` and the
/// configured species column. Times are in `<int>m<float>s` notation
/// and run through the lenient time parser.
pub fn read_ground_truth(path: &Path, species_column: &str) -> Result<Vec<GroundTruthRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::GroundTruthRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = reader
        .headers()
        .map_err(|e| Error::GroundTruthRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();

    let required = ["path", "start_time", "end_time", species_column];
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !headers.iter().any(|h| h == **name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    // Presence checked above.
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let idx_path = column("path");
    let idx_start = column("start_time");
    let idx_end = column("end_time");
    let idx_species = column(species_column);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::GroundTruthRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        rows.push(GroundTruthRow {
            path: field(idx_path),
            start_seconds: parse_time_to_seconds(&field(idx_start)),
            end_seconds: parse_time_to_seconds(&field(idx_end)),
            species: field(idx_species),
        });
    }

    Ok(rows)
}

/// Run the evaluation over a directory of result files.
///
/// Result files that fail to parse are skipped with a warning; (file,
/// species) pairs without ground-truth labels are skipped silently at
/// debug level, matching the per-pair granularity of the output.
pub fn run_evaluation(config: &Config, options: &EvalOptions) -> Result<Vec<MetricsRow>> {
    if !options.results_dir.exists() {
        return Err(Error::InputNotFound {
            path: options.results_dir.clone(),
        });
    }
    if !options.ground_truth.exists() {
        return Err(Error::InputNotFound {
            path: options.ground_truth.clone(),
        });
    }

    let threshold = options.threshold.unwrap_or(config.eval.threshold);
    let seconds = config.eval.timeline_seconds;
    let truth = read_ground_truth(&options.ground_truth, &config.eval.species_column)?;
    let species_map = config.species_map()?;

    let files = collect_result_files(&options.results_dir)?;
    if files.is_empty() {
        return Err(Error::NoResultFiles {
            path: options.results_dir.clone(),
        });
    }

    let mut rows = Vec::new();

    for file in &files {
        let filename = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let file_name = filename
            .strip_suffix(RESULTS_CSV_SUFFIX)
            .unwrap_or(filename)
            .to_string();

        // Preprocessing markers are not part of the labeled path.
        let mut base = file_name.clone();
        for marker in PREPROCESS_MARKERS {
            base = base.replace(marker, "");
        }

        let predictions = match read_result_file(file) {
            Ok(predictions) => predictions,
            Err(e) => {
                warn!("skipping {}: {e}", file.display());
                continue;
            }
        };

        for (label, entry) in &species_map {
            let intervals: Vec<(f64, f64)> = truth
                .iter()
                .filter(|t| t.path.contains(&base) && t.species == *label)
                .map(|t| (t.start_seconds, t.end_seconds))
                .collect();

            if intervals.is_empty() {
                debug!("no ground truth for {file_name} / {label}");
                continue;
            }

            let truth_tl = truth_timeline(&intervals, seconds);

            let species_predictions: Vec<(f64, f32)> = predictions
                .iter()
                .filter(|p| p.common_name == entry.common_name)
                .map(|p| {
                    (
                        parse_time_to_seconds(&p.start),
                        p.confidence.parse::<f32>().unwrap_or(0.0),
                    )
                })
                .collect();
            let prediction_tl = prediction_timeline(&species_predictions, seconds);

            let m = threshold_metrics(&truth_tl, &prediction_tl, threshold);
            info!(
                "{file_name} / {label}: F1 {:.4}, precision {:.4}, recall {:.4}",
                m.f1, m.precision, m.recall
            );

            rows.push(MetricsRow {
                file_name: file_name.clone(),
                species: label.clone(),
                f1: m.f1,
                precision: m.precision,
                recall: m.recall,
            });
        }
    }

    Ok(rows)
}

/// Write metrics rows to a CSV file.
pub fn write_metrics(path: &Path, rows: &[MetricsRow]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::MetricsWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let mut write = |line: String| {
        writeln!(writer, "{line}").map_err(|e| Error::MetricsWrite {
            path: path.to_path_buf(),
            source: e,
        })
    };

    write("file_name,species,f1_score,precision,recall".to_string())?;
    for row in rows {
        write(format!(
            "{},{},{:.4},{:.4},{:.4}",
            escape_csv(&row.file_name),
            escape_csv(&row.species),
            row.f1,
            row.precision,
            row.recall
        ))?;
    }

    writer.flush().map_err(|e| Error::MetricsWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_ground_truth(dir: &Path) -> PathBuf {
        let path = dir.join("train.csv");
        fs::write(
            &path,
            "path,start_time,end_time,species\n\
             data/audio/rec1.mp3,0m0s,0m10s,owl\n\
             data/audio/rec1.mp3,0m8s,0m12s,owl\n\
             data/audio/rec2.mp3,1m0s,1m5s,nightjar\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_read_ground_truth_parses_times() {
        let dir = TempDir::new().unwrap();
        let path = write_ground_truth(dir.path());

        let rows = read_ground_truth(&path, "species").unwrap();
        assert_eq!(rows.len(), 3);
        assert!((rows[0].end_seconds - 10.0).abs() < f64::EPSILON);
        assert!((rows[2].start_seconds - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_read_ground_truth_missing_species_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, "path,start_time,end_time\nx,0m0s,0m1s\n").unwrap();

        match read_ground_truth(&path, "species") {
            Err(Error::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["species".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_run_evaluation_end_to_end() {
        let dir = TempDir::new().unwrap();
        let ground_truth = write_ground_truth(dir.path());

        let results = dir.path().join("results");
        fs::create_dir(&results).unwrap();
        fs::write(
            results.join(format!("rec1{RESULTS_CSV_SUFFIX}")),
            "Start (s),End (s),Scientific name,Common name,Confidence\n\
             0.0,3.0,Strix uralensis,Ural Owl,0.9\n\
             30.0,33.0,Strix uralensis,Ural Owl,0.8\n",
        )
        .unwrap();

        let options = EvalOptions {
            results_dir: results,
            ground_truth,
            output: dir.path().join("metrics.csv"),
            threshold: None,
        };
        let rows = run_evaluation(&Config::default(), &options).unwrap();

        // only the owl pair has labels for rec1
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.file_name, "rec1");
        assert_eq!(row.species, "owl");
        // truth covers seconds 0..=12; predictions hit second 0 (tp)
        // and second 30 (fp)
        assert!((row.precision - 0.5).abs() < 1e-6);
        assert!((row.recall - 1.0 / 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_write_metrics_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metrics.csv");
        let rows = vec![MetricsRow {
            file_name: "rec1".to_string(),
            species: "owl".to_string(),
            f1: 0.5,
            precision: 0.75,
            recall: 0.375,
        }];

        write_metrics(&path, &rows).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("file_name,species,f1_score,precision,recall"));
        assert!(contents.contains("rec1,owl,0.5000,0.7500,0.3750"));
    }

    #[test]
    fn test_missing_results_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let options = EvalOptions {
            results_dir: dir.path().join("missing"),
            ground_truth: write_ground_truth(dir.path()),
            output: dir.path().join("metrics.csv"),
            threshold: None,
        };
        assert!(matches!(
            run_evaluation(&Config::default(), &options),
            Err(Error::InputNotFound { .. })
        ));
    }
}
