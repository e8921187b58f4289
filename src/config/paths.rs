//! Platform-specific configuration and data paths.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::constants::{APP_NAME, DEFAULT_DB_FILENAME};
use crate::error::{Error, Result};

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/avilog/`
/// - macOS: `~/Library/Application Support/avilog/`
/// - Windows: `%APPDATA%\avilog\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the data directory for the current platform.
pub fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(Error::DataDirNotFound)
}

/// Get the default database path under the platform data directory.
pub fn default_database_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DEFAULT_DB_FILENAME))
}
