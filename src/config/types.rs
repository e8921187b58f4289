//! Configuration type definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{classifier, eval};
use crate::session::{SpeciesMap, default_species_map};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// External classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Evaluation settings.
    #[serde(default)]
    pub eval: EvalConfig,

    /// Session naming settings.
    #[serde(default)]
    pub naming: NamingConfig,
}

/// Database settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file path; platform data directory when unset.
    pub path: Option<PathBuf>,
}

/// External classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Classifier program to invoke.
    pub program: String,

    /// Path to a custom model; the stock model when unset.
    pub model: Option<PathBuf>,

    /// Segment overlap in seconds.
    pub overlap: f32,

    /// Detection sensitivity.
    pub sensitivity: f32,

    /// Minimum confidence for the stock model.
    pub min_confidence: f32,

    /// Minimum confidence applied when a custom model is supplied.
    pub custom_model_min_confidence: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            program: classifier::DEFAULT_PROGRAM.to_string(),
            model: None,
            overlap: classifier::DEFAULT_OVERLAP,
            sensitivity: classifier::DEFAULT_SENSITIVITY,
            min_confidence: classifier::DEFAULT_MIN_CONFIDENCE,
            custom_model_min_confidence: classifier::CUSTOM_MODEL_MIN_CONFIDENCE,
        }
    }
}

/// Evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Confidence threshold for metric computation.
    pub threshold: f32,

    /// Length of the per-second timeline scaffold.
    pub timeline_seconds: usize,

    /// Ground-truth column holding the species label.
    pub species_column: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            threshold: eval::DEFAULT_THRESHOLD,
            timeline_seconds: eval::TIMELINE_SECONDS,
            species_column: eval::DEFAULT_SPECIES_COLUMN.to_string(),
        }
    }
}

/// Session naming settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Optional JSON file overriding the embedded species map.
    pub species_file: Option<PathBuf>,

    /// Species map by label.
    pub species: SpeciesMap,

    /// Path keyword to location name table for location inference.
    pub locations: BTreeMap<String, String>,

    /// Location used when inference finds nothing.
    pub fallback_location: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            species_file: None,
            species: default_species_map(),
            locations: default_location_table(),
            fallback_location: "survey-site".to_string(),
        }
    }
}

/// Default path keyword to location name table.
fn default_location_table() -> BTreeMap<String, String> {
    [
        ("forest", "forest"),
        ("park", "park"),
        ("mount", "mountain"),
        ("river", "river"),
        ("lake", "lake"),
        ("sea", "coast"),
        ("shore", "coast"),
        ("field", "field"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
