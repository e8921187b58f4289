//! Session name suggestion from file paths.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::NamingConfig;
use crate::constants::{GENERIC_ANALYSIS_TOKEN, session_date};

use super::codec::encode_session_name;
use super::species::{SpeciesMap, detect_species};

/// A proposed session name with the parts it was assembled from.
#[derive(Debug, Clone)]
pub struct NameSuggestion {
    /// The proposed name.
    pub suggested_name: String,
    /// Inferred location.
    pub location: String,
    /// Species labels detected from the filename.
    pub species: Vec<String>,
    /// Date stamp used in the proposal.
    pub date: String,
    /// Alternative name formats.
    pub alternatives: Vec<String>,
}

/// Infer a location from a path.
///
/// Case-insensitive keyword match over the whole path string, falling
/// back to the immediate parent directory name, then to the configured
/// placeholder.
pub fn infer_location(path: &Path, locations: &BTreeMap<String, String>, fallback: &str) -> String {
    let full_path = path.to_string_lossy().to_lowercase();

    for (keyword, location) in locations {
        if full_path.contains(&keyword.to_lowercase()) {
            return location.clone();
        }
    }

    if let Some(parent_name) = path.parent().and_then(Path::file_name) {
        let parent_name = parent_name.to_string_lossy();
        if !parent_name.is_empty() && parent_name != "." {
            return parent_name.to_string();
        }
    }

    fallback.to_string()
}

/// Suggest a session name for an input path.
///
/// Combines filename species detection, location inference and the
/// current date, plus a few alternative formats (short date, verbose
/// date, and compacted common names when species were detected).
pub fn suggest_session_name(
    path: &Path,
    species_map: &SpeciesMap,
    naming: &NamingConfig,
) -> NameSuggestion {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let species = detect_species(&filename, species_map);
    let location = infer_location(path, &naming.locations, &naming.fallback_location);

    let now = chrono::Local::now();
    let date = now.format(session_date::FULL).to_string();

    let suggested_name = if species.is_empty() {
        format!("{location}_{GENERIC_ANALYSIS_TOKEN}_{date}")
    } else {
        encode_session_name(&location, &species, Some(&date))
    };

    let mut alternatives = vec![
        encode_session_name(
            &location,
            &species,
            Some(&now.format(session_date::SHORT).to_string()),
        ),
        encode_session_name(
            &location,
            &species,
            Some(&now.format(session_date::VERBOSE).to_string()),
        ),
    ];

    // Compacted common-name variant, e.g. GrayNightjar.
    let common_names: Vec<String> = species
        .iter()
        .filter_map(|label| species_map.get(label))
        .map(|entry| entry.common_name.replace(' ', ""))
        .collect();
    if !common_names.is_empty() {
        alternatives.push(encode_session_name(&location, &common_names, Some(&date)));
    }

    NameSuggestion {
        suggested_name,
        location,
        species,
        date,
        alternatives,
    }
}
