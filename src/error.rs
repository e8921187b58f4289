//! Error types for avilog.

/// Result type alias for avilog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for avilog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Data directory could not be determined.
    #[error("could not determine data directory for this platform")]
    DataDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to read species map file.
    #[error("failed to read species map file '{path}'")]
    SpeciesMapRead {
        /// Path to the species map file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse species map file.
    #[error("failed to parse species map file '{path}'")]
    SpeciesMapParse {
        /// Path to the species map file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Input file or directory does not exist.
    #[error("input path not found: {path}")]
    InputNotFound {
        /// The missing path.
        path: std::path::PathBuf,
    },

    /// No classifier result CSV files found in a directory.
    #[error("no result CSV files found in '{path}'")]
    NoResultFiles {
        /// The searched directory.
        path: std::path::PathBuf,
    },

    /// A result file lacks required columns.
    #[error("result file '{}' is missing required columns: {}", .path.display(), .columns.join(", "))]
    MissingColumns {
        /// Path to the result file.
        path: std::path::PathBuf,
        /// Names of the missing columns.
        columns: Vec<String>,
    },

    /// Failed to read a result CSV file.
    #[error("failed to read result file '{path}'")]
    ResultRead {
        /// Path to the result file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A single-file import failed.
    #[error("import of '{filename}' failed: {message}")]
    ImportFailed {
        /// Name of the file that failed.
        filename: String,
        /// Description of the failure.
        message: String,
    },

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Failed to open the detection database.
    #[error("failed to open database '{path}'")]
    StoreOpen {
        /// Path to the database file.
        path: std::path::PathBuf,
        /// Underlying storage error.
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to write an export file.
    #[error("failed to write export file '{path}'")]
    ExportWrite {
        /// Path to the export file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the ground-truth file.
    #[error("failed to read ground truth file '{path}'")]
    GroundTruthRead {
        /// Path to the ground-truth file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to write the metrics file.
    #[error("failed to write metrics file '{path}'")]
    MetricsWrite {
        /// Path to the metrics file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to launch the external classifier.
    #[error("failed to launch classifier '{program}'")]
    ClassifierLaunch {
        /// The classifier program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external classifier exited with a failure.
    #[error("classifier failed ({status}): {stderr}")]
    ClassifierFailed {
        /// Exit status description.
        status: String,
        /// Captured standard error output.
        stderr: String,
    },
}
