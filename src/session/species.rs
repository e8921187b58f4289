//! Configurable species keyword map.
//!
//! Maps a short species label to its display names and the filename
//! keywords used to detect it. The map is embedded in the configuration
//! and can be replaced by an external JSON file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One configured species: display names plus filename keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Common name, as the classifier reports it in `Common name`.
    pub common_name: String,
    /// Scientific name.
    pub scientific_name: String,
    /// Case-insensitive keywords matched against filenames.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Ordered map from species label to its entry.
///
/// `BTreeMap` keeps iteration deterministic, which keeps detection
/// output and suggested names stable across runs.
pub type SpeciesMap = BTreeMap<String, SpeciesEntry>;

/// Load a species map from a JSON file (`label -> entry`).
pub fn load_species_map(path: &Path) -> Result<SpeciesMap> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::SpeciesMapRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&contents).map_err(|e| Error::SpeciesMapParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Default species map covering the surveyed nocturnal species.
pub fn default_species_map() -> SpeciesMap {
    let mut map = SpeciesMap::new();
    map.insert(
        "nightjar".to_string(),
        SpeciesEntry {
            common_name: "Gray Nightjar".to_string(),
            scientific_name: "Caprimulgus jotaka".to_string(),
            keywords: vec!["yotaka".to_string(), "nightjar".to_string()],
        },
    );
    map.insert(
        "goshawk".to_string(),
        SpeciesEntry {
            common_name: "Northern Goshawk".to_string(),
            scientific_name: "Accipiter gentilis".to_string(),
            keywords: vec!["ootaka".to_string(), "goshawk".to_string()],
        },
    );
    map.insert(
        "owl".to_string(),
        SpeciesEntry {
            common_name: "Ural Owl".to_string(),
            scientific_name: "Strix uralensis".to_string(),
            keywords: vec!["fukurou".to_string(), "owl".to_string()],
        },
    );
    map.insert(
        "heron".to_string(),
        SpeciesEntry {
            common_name: "Japanese Night Heron".to_string(),
            scientific_name: "Gorsachius goisagi".to_string(),
            keywords: vec!["mizogoi".to_string(), "heron".to_string()],
        },
    );
    map.insert(
        "buzzard".to_string(),
        SpeciesEntry {
            common_name: "Gray-faced Buzzard".to_string(),
            scientific_name: "Butastur indicus".to_string(),
            keywords: vec!["sashiba".to_string(), "buzzard".to_string()],
        },
    );
    map
}

/// Detect species labels from a filename by keyword match.
///
/// Matching is case-insensitive substring search; each species matches
/// at most once. Returned labels are sorted and deduplicated.
pub fn detect_species(filename: &str, species: &SpeciesMap) -> Vec<String> {
    let filename_lower = filename.to_lowercase();

    species
        .iter()
        .filter(|(label, entry)| {
            entry
                .keywords
                .iter()
                .chain(std::iter::once(*label))
                .any(|keyword| filename_lower.contains(&keyword.to_lowercase()))
        })
        .map(|(label, _)| label.clone())
        .collect()
}
