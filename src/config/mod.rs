//! Application configuration.
//!
//! All tunable state lives in one explicit [`Config`] object loaded from
//! a TOML file; components receive it (or slices of it) at construction
//! instead of reading process-wide environment state.

mod file;
mod paths;
mod types;

pub use file::{load_config_file, load_default_config, save_config, save_default_config};
pub use paths::{config_dir, config_file_path, data_dir, default_database_path};
pub use types::{ClassifierConfig, Config, DatabaseConfig, EvalConfig, NamingConfig};

use std::path::PathBuf;

use crate::error::Result;
use crate::session::{SpeciesMap, load_species_map};

impl Config {
    /// Resolve the database path: configured value or the platform default.
    pub fn database_path(&self) -> Result<PathBuf> {
        self.database
            .path
            .clone()
            .map_or_else(default_database_path, Ok)
    }

    /// Resolve the species map: external JSON file when configured,
    /// otherwise the embedded map.
    pub fn species_map(&self) -> Result<SpeciesMap> {
        match &self.naming.species_file {
            Some(path) => load_species_map(path),
            None => Ok(self.naming.species.clone()),
        }
    }
}
