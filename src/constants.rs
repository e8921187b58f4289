//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "avilog";

/// Default database filename under the platform data directory.
pub const DEFAULT_DB_FILENAME: &str = "avilog.db";

/// Suffix of classifier result CSV files.
pub const RESULTS_CSV_SUFFIX: &str = ".BirdNET.results.csv";

/// Columns every classifier result CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Start (s)",
    "End (s)",
    "Scientific name",
    "Common name",
    "Confidence",
];

/// Session-name token used when no species is known.
pub const UNKNOWN_SPECIES_TOKEN: &str = "unknown";

/// Session-name token used when only audio analysis is known.
pub const GENERIC_ANALYSIS_TOKEN: &str = "audio-analysis";

/// Session date formats.
pub mod session_date {
    /// Full date stamp used in session names.
    pub const FULL: &str = "%Y%m%d";
    /// Short date stamp used in alternative session names.
    pub const SHORT: &str = "%m%d";
    /// Verbose date stamp with hour, used in alternative session names.
    pub const VERBOSE: &str = "%Y-%m-%d-%Hh";
}

/// Confidence value bounds and formatting.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f64 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f64 = 1.0;
    /// Decimal places for confidence formatting.
    pub const DECIMAL_PLACES: usize = 4;
}

/// Statistics query limits.
pub mod stats {
    /// Number of top species reported by the statistics query.
    pub const TOP_SPECIES_LIMIT: usize = 10;
}

/// External classifier invocation defaults.
pub mod classifier {
    /// Default classifier program name.
    pub const DEFAULT_PROGRAM: &str = "birdnet-analyze";
    /// Default segment overlap in seconds.
    pub const DEFAULT_OVERLAP: f32 = 2.0;
    /// Default detection sensitivity.
    pub const DEFAULT_SENSITIVITY: f32 = 1.5;
    /// Default minimum confidence for the stock model.
    pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.01;
    /// Minimum confidence applied when a custom model is supplied.
    pub const CUSTOM_MODEL_MIN_CONFIDENCE: f32 = 0.1;
    /// Subdirectory where analysis results are written by default.
    pub const DEFAULT_RESULTS_DIR: &str = "analysis_results";
}

/// Evaluation pipeline defaults.
pub mod eval {
    /// Default confidence threshold for metric computation.
    pub const DEFAULT_THRESHOLD: f32 = 0.1;
    /// Length of the per-second timeline scaffold (one hour).
    pub const TIMELINE_SECONDS: usize = 3600;
    /// Default ground-truth column holding the species label.
    pub const DEFAULT_SPECIES_COLUMN: &str = "species";
    /// Filename markers stripped when matching results to ground truth.
    pub const PREPROCESS_MARKERS: [&str; 2] = ["_normalized", "_denoised"];
}
