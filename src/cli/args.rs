//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::pipeline::SessionSpec;

/// Manage `BirdNET` detection results: import, query, export, evaluate.
#[derive(Debug, Parser)]
#[command(name = "avilog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Database file (overrides configuration).
    #[arg(long, global = true, env = "AVILOG_DATABASE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import classifier result CSVs into a session.
    Import {
        /// Result CSV file or directory of result CSVs.
        path: PathBuf,

        /// Session naming options.
        #[command(flatten)]
        naming: NamingArgs,

        /// Hide the progress bar.
        #[arg(long)]
        no_progress: bool,
    },

    /// List or delete sessions.
    Sessions {
        /// Sessions action to perform (default: list).
        #[command(subcommand)]
        action: Option<SessionsAction>,
    },

    /// Show aggregate statistics.
    Stats {
        /// Restrict to one session identifier.
        #[arg(short, long)]
        session: Option<i64>,
    },

    /// Export detections to a CSV file.
    Export {
        /// Output CSV path.
        output: PathBuf,

        /// Restrict to one session identifier.
        #[arg(short, long)]
        session: Option<i64>,
    },

    /// Evaluate result files against hand-labeled ground truth.
    Eval {
        /// Directory of classifier result CSVs.
        #[arg(long)]
        results_dir: PathBuf,

        /// Ground-truth CSV file.
        #[arg(long)]
        ground_truth: PathBuf,

        /// Metrics CSV to write.
        #[arg(short, long)]
        output: PathBuf,

        /// Confidence threshold (0.0-1.0).
        #[arg(short, long, value_parser = parse_confidence)]
        threshold: Option<f32>,
    },

    /// Run the external classifier, then import its results.
    Analyze {
        /// Directory of audio files to analyze.
        input_dir: PathBuf,

        /// Custom model path.
        #[arg(long)]
        model: Option<PathBuf>,

        /// Where result CSVs are written (default: `<input>/analysis_results`).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Session naming options.
        #[command(flatten)]
        naming: NamingArgs,

        /// Hide the progress bar.
        #[arg(long)]
        no_progress: bool,
    },

    /// Suggest a session name for a path.
    Suggest {
        /// File or directory the name should describe.
        path: PathBuf,
    },

    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sessions subcommand actions.
#[derive(Debug, Subcommand)]
pub enum SessionsAction {
    /// List all sessions.
    List,
    /// Delete all sessions with the given name.
    Delete {
        /// Session name to delete.
        name: String,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Session naming options shared by import and analyze.
#[derive(Debug, Clone, Default, Args)]
pub struct NamingArgs {
    /// Session name (`location_species_date` format supported).
    #[arg(short, long)]
    pub session: Option<String>,

    /// Location for an encoded session name.
    #[arg(short, long, requires = "species")]
    pub location: Option<String>,

    /// Species for an encoded session name (comma-separated).
    #[arg(long, requires = "location")]
    pub species: Option<String>,

    /// Date for an encoded session name (default: today).
    #[arg(short, long)]
    pub date: Option<String>,

    /// Prompt for the session name interactively.
    #[arg(short, long, conflicts_with = "session")]
    pub interactive: bool,
}

impl From<&NamingArgs> for SessionSpec {
    fn from(args: &NamingArgs) -> Self {
        Self {
            name: args.session.clone(),
            location: args.location.clone(),
            species: args.species.clone(),
            date: args.date.clone(),
            interactive: args.interactive,
        }
    }
}

/// Parse and validate a confidence value.
fn parse_confidence(value: &str) -> Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(format!("confidence must be 0.0-1.0, got {parsed}"));
    }
    Ok(parsed)
}
