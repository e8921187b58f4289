//! Avilog - `BirdNET` detection result management.
//!
//! Imports classifier CSV output into a SQLite session store, computes
//! statistics, exports detections, evaluates against hand-labeled
//! ground truth and drives the external classifier.

#![warn(missing_docs)]

pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod eval;
pub mod pipeline;
pub mod session;
pub mod store;
pub mod utils;

use std::path::{Path, PathBuf};

use clap::Parser;

use classifier::SystemRunner;
use cli::{Cli, Command, ConfigAction, NamingArgs, SessionsAction};
use config::Config;
use constants::classifier::DEFAULT_RESULTS_DIR;
use eval::EvalOptions;
use pipeline::SessionSpec;
use store::DetectionStore;

pub use error::{Error, Result};

/// Main entry point for the avilog CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let mut config = config::load_default_config()?;
    if let Some(database) = cli.database {
        config.database.path = Some(database);
    }

    let quiet = cli.quiet;

    match cli.command {
        Command::Import {
            path,
            naming,
            no_progress,
        } => handle_import(&config, &path, &naming, !no_progress && !quiet),
        Command::Sessions { action } => handle_sessions(&config, action),
        Command::Stats { session } => handle_stats(&config, session),
        Command::Export { output, session } => handle_export(&config, &output, session),
        Command::Eval {
            results_dir,
            ground_truth,
            output,
            threshold,
        } => handle_eval(
            &config,
            &EvalOptions {
                results_dir,
                ground_truth,
                output,
                threshold,
            },
        ),
        Command::Analyze {
            input_dir,
            model,
            output_dir,
            naming,
            no_progress,
        } => handle_analyze(
            &config,
            &input_dir,
            model,
            output_dir,
            &naming,
            !no_progress && !quiet,
        ),
        Command::Suggest { path } => handle_suggest(&config, &path),
        Command::Config { action } => handle_config_command(action),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn open_store(config: &Config) -> Result<DetectionStore> {
    DetectionStore::open(config.database_path()?)
}

fn handle_import(
    config: &Config,
    path: &Path,
    naming: &NamingArgs,
    progress_enabled: bool,
) -> Result<()> {
    let store = open_store(config)?;
    let spec = SessionSpec::from(naming);
    let report = pipeline::import_path(&store, config, path, &spec, progress_enabled)?;

    println!("Import completed:");
    println!(
        "  Session: '{}' (ID: {})",
        report.session_name, report.session_id
    );
    println!(
        "  Files: {}/{} successful",
        report.imported_files, report.total_files
    );
    println!("  Detections: {} total", report.total_detections);

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(count) => println!("  [OK] {}: {count} detections", outcome.filename),
            Err(message) => println!("  [ERROR] {}: {message}", outcome.filename),
        }
    }

    let parsed = session::decode_session_name(&report.session_name);
    if parsed.valid {
        println!("  Location: {}", parsed.location);
        println!("  Species: {}", parsed.species.join(", "));
        println!("  Date: {}", parsed.date);
    }

    // A failed single-file import is a hard failure; batch imports
    // carry on and report per file.
    if path.is_file()
        && let Some(outcome) = report.outcomes.iter().find(|o| o.result.is_err())
    {
        return Err(Error::ImportFailed {
            filename: outcome.filename.clone(),
            message: outcome
                .result
                .as_ref()
                .err()
                .cloned()
                .unwrap_or_default(),
        });
    }

    Ok(())
}

fn handle_sessions(config: &Config, action: Option<SessionsAction>) -> Result<()> {
    let store = open_store(config)?;

    match action {
        None | Some(SessionsAction::List) => {
            let sessions = store.get_sessions()?;
            if sessions.is_empty() {
                println!("No sessions found.");
                return Ok(());
            }

            for s in &sessions {
                println!("ID: {}", s.id);
                println!("Name: {}", s.session_name);
                let parsed = session::decode_session_name(&s.session_name);
                if parsed.valid {
                    println!(
                        "  Location: {} / Species: {} / Date: {}",
                        parsed.location,
                        parsed.species.join(", "),
                        parsed.date
                    );
                }
                println!("Model: {} ({})", s.model_name, s.model_type);
                println!("Files: {}, Detections: {}", s.file_count, s.detection_count);
                println!("Created: {}", s.created_at);
                println!("{}", "-".repeat(60));
            }
            Ok(())
        }
        Some(SessionsAction::Delete { name }) => {
            if store.delete_session(&name)? {
                println!("Deleted session '{name}'");
            } else {
                println!("No session named '{name}'");
            }
            Ok(())
        }
    }
}

fn handle_stats(config: &Config, session: Option<i64>) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.get_statistics(session)?;

    println!("Database statistics:");
    println!("  Sessions: {}", stats.session_count);
    println!("  Audio files: {}", stats.file_count);
    println!("  Detections: {}", stats.detection_count);
    println!("  Species: {}", stats.species_count);

    if let (Some(avg), Some(min), Some(max)) = (
        stats.avg_confidence,
        stats.min_confidence,
        stats.max_confidence,
    ) {
        println!("  Confidence: avg {avg:.3}, min {min:.3}, max {max:.3}");
    }

    if !stats.top_species.is_empty() {
        println!("  Top species:");
        for sp in &stats.top_species {
            println!(
                "    {} ({}): {} detections, avg confidence {:.3}",
                sp.common_name, sp.scientific_name, sp.detection_count, sp.avg_confidence
            );
        }
    }

    Ok(())
}

fn handle_export(config: &Config, output: &Path, session: Option<i64>) -> Result<()> {
    let store = open_store(config)?;
    let count = store.export_csv(output, session)?;
    println!("Exported {count} detections to {}", output.display());
    Ok(())
}

fn handle_eval(config: &Config, options: &EvalOptions) -> Result<()> {
    let rows = eval::run_evaluation(config, options)?;
    eval::write_metrics(&options.output, &rows)?;

    println!(
        "Wrote {} metrics row(s) to {}",
        rows.len(),
        options.output.display()
    );
    for row in &rows {
        println!(
            "  {} / {}: F1 {:.4}, precision {:.4}, recall {:.4}",
            row.file_name, row.species, row.f1, row.precision, row.recall
        );
    }
    Ok(())
}

fn handle_analyze(
    config: &Config,
    input_dir: &Path,
    model: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    naming: &NamingArgs,
    progress_enabled: bool,
) -> Result<()> {
    if !input_dir.exists() {
        return Err(Error::InputNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    let mut classifier_config = config.classifier.clone();
    if model.is_some() {
        classifier_config.model = model;
    }

    let output_dir = output_dir.unwrap_or_else(|| input_dir.join(DEFAULT_RESULTS_DIR));
    classifier::run_analysis(&SystemRunner, &classifier_config, input_dir, &output_dir)?;

    println!("Analysis complete, importing results from {}", output_dir.display());
    handle_import(config, &output_dir, naming, progress_enabled)
}

fn handle_suggest(config: &Config, path: &Path) -> Result<()> {
    let suggestion = session::suggest_session_name(path, &config.species_map()?, &config.naming);

    println!("Suggested session name: {}", suggestion.suggested_name);
    println!("  Location: {}", suggestion.location);
    if suggestion.species.is_empty() {
        println!("  Species: none detected");
    } else {
        println!("  Species: {}", suggestion.species.join(", "));
    }
    println!("  Date: {}", suggestion.date);

    println!("Alternatives:");
    for alternative in &suggestion.alternatives {
        println!("  {alternative}");
    }

    Ok(())
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config::config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = config::save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = config::load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config::config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
