//! Detection import pipeline.
//!
//! Takes a single classifier result CSV or a directory of them,
//! resolves one session for the batch and imports each file, carrying
//! on past individual failures.

mod progress;
mod reader;

pub use progress::{create_file_progress, finish_progress, inc_progress};
pub use reader::read_result_file;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::constants::RESULTS_CSV_SUFFIX;
use crate::error::{Error, Result};
use crate::session::{NameSuggestion, encode_session_name, suggest_session_name};
use crate::store::DetectionStore;

/// How the session name for an import is chosen.
#[derive(Debug, Clone, Default)]
pub struct SessionSpec {
    /// Explicit session name.
    pub name: Option<String>,
    /// Location component for encoded names.
    pub location: Option<String>,
    /// Comma-separated species components for encoded names.
    pub species: Option<String>,
    /// Date component for encoded names.
    pub date: Option<String>,
    /// Prompt on the terminal instead of auto-suggesting.
    pub interactive: bool,
}

/// Outcome of importing one result file.
#[derive(Debug)]
pub struct FileOutcome {
    /// Name of the result file.
    pub filename: String,
    /// Detections imported, or the failure message.
    pub result: std::result::Result<usize, String>,
}

/// Summary of an import run.
#[derive(Debug)]
pub struct ImportReport {
    /// Identifier of the session everything was imported into.
    pub session_id: i64,
    /// Name of that session.
    pub session_name: String,
    /// Number of result files considered.
    pub total_files: usize,
    /// Number of files imported successfully.
    pub imported_files: usize,
    /// Number of files that failed.
    pub failed_files: usize,
    /// Total detections imported across all files.
    pub total_detections: usize,
    /// Per-file outcomes in processing order.
    pub outcomes: Vec<FileOutcome>,
}

/// Collect classifier result CSV files in a directory, sorted by name.
pub fn collect_result_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(RESULTS_CSV_SUFFIX))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Resolve the session name for an import.
///
/// Precedence: explicit name, then location/species/date components,
/// then an interactive prompt, then the auto-suggestion from the input
/// path.
pub fn resolve_session_name(input: &Path, spec: &SessionSpec, config: &Config) -> Result<String> {
    if let Some(name) = &spec.name {
        return Ok(name.clone());
    }

    if let (Some(location), Some(species)) = (&spec.location, &spec.species) {
        let species: Vec<String> = species
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        return Ok(encode_session_name(location, &species, spec.date.as_deref()));
    }

    let suggestion = suggest_session_name(input, &config.species_map()?, &config.naming);
    if spec.interactive {
        return prompt_session_name(&suggestion);
    }

    info!("auto-generated session name: {}", suggestion.suggested_name);
    Ok(suggestion.suggested_name)
}

fn prompt_session_name(suggestion: &NameSuggestion) -> Result<String> {
    use std::io::Write;

    println!("Suggested session name: {}", suggestion.suggested_name);
    if !suggestion.species.is_empty() {
        println!("  detected species: {}", suggestion.species.join(", "));
    }
    println!("  location: {}", suggestion.location);
    for (i, alternative) in suggestion.alternatives.iter().enumerate() {
        println!("  alternative {}: {alternative}", i + 1);
    }

    print!("Session name [{}]: ", suggestion.suggested_name);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Ok(suggestion.suggested_name.clone())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Import one result CSV file or a directory of them into a single
/// session.
///
/// Directory mode continues past individual file failures; each file's
/// outcome lands in the report. Missing input and a directory without
/// result files are hard errors.
pub fn import_path(
    store: &DetectionStore,
    config: &Config,
    input: &Path,
    spec: &SessionSpec,
    progress_enabled: bool,
) -> Result<ImportReport> {
    if !input.exists() {
        return Err(Error::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    let files = if input.is_dir() {
        let files = collect_result_files(input)?;
        if files.is_empty() {
            return Err(Error::NoResultFiles {
                path: input.to_path_buf(),
            });
        }
        files
    } else {
        vec![input.to_path_buf()]
    };

    let session_name = resolve_session_name(input, spec, config)?;
    let session_id = store.create_session(
        &session_name,
        "BirdNET",
        "default",
        &format!("Imported from {}", input.display()),
    )?;

    info!(
        "importing {} file(s) into session '{session_name}'",
        files.len()
    );

    let bar = create_file_progress(files.len(), progress_enabled);
    let mut report = ImportReport {
        session_id,
        session_name,
        total_files: files.len(),
        imported_files: 0,
        failed_files: 0,
        total_detections: 0,
        outcomes: Vec::new(),
    };

    for file in &files {
        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match import_file(store, session_id, file) {
            Ok(count) => {
                report.imported_files += 1;
                report.total_detections += count;
                report.outcomes.push(FileOutcome {
                    filename,
                    result: Ok(count),
                });
            }
            Err(e) => {
                warn!("failed to import {}: {e}", file.display());
                report.failed_files += 1;
                report.outcomes.push(FileOutcome {
                    filename,
                    result: Err(e.to_string()),
                });
            }
        }
        inc_progress(bar.as_ref());
    }
    finish_progress(bar, "done");

    Ok(report)
}

/// Import a single result file into an existing session.
///
/// The file is read and validated before anything is written, so a
/// missing-column failure leaves neither an audio file row nor
/// detections behind.
fn import_file(store: &DetectionStore, session_id: i64, file: &Path) -> Result<usize> {
    let rows = read_result_file(file)?;

    let filename = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let audio_filename = filename.strip_suffix(RESULTS_CSV_SUFFIX).unwrap_or(filename);

    let full_path = file.to_string_lossy();
    let audio_path = full_path
        .strip_suffix(RESULTS_CSV_SUFFIX)
        .unwrap_or(&full_path);

    let file_id = store.add_audio_file(session_id, audio_filename, audio_path, 0.0)?;
    store.import_detections(file_id, &rows)
}
