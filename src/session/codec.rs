//! Session name encoding and decoding.
//!
//! Session names follow the `location_species_date` convention, with
//! multiple species joined by further underscores.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{UNKNOWN_SPECIES_TOKEN, session_date};

/// Decode pattern: location, species segment, date.
const SESSION_NAME_PATTERN: &str = r"^(.+?)_(.+?)_(.+)$";

fn session_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)] // pattern is a checked literal
    RE.get_or_init(|| Regex::new(SESSION_NAME_PATTERN).unwrap())
}

/// Decoded parts of a `location_species_date` session name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSessionName {
    /// Location segment.
    pub location: String,
    /// Species labels from the middle segment.
    pub species: Vec<String>,
    /// Date segment.
    pub date: String,
    /// Whether the name matched the expected shape.
    pub valid: bool,
}

/// Build a session name from its parts.
///
/// The date defaults to the current local date as `YYYYMMDD`; an empty
/// species list renders the literal `unknown` token.
pub fn encode_session_name(location: &str, species: &[String], date: Option<&str>) -> String {
    let date = date.map_or_else(
        || chrono::Local::now().format(session_date::FULL).to_string(),
        ToString::to_string,
    );

    let species_str = if species.is_empty() {
        UNKNOWN_SPECIES_TOKEN.to_string()
    } else {
        species.join("_")
    };

    format!("{location}_{species_str}_{date}")
}

/// Split a session name into location, species list and date.
///
/// Non-matching input yields empty fields with `valid = false` instead
/// of an error. The sub-matches are non-greedy, so names whose location
/// or species contain extra underscores parse ambiguously: decoding is
/// not guaranteed to invert [`encode_session_name`] for multi-word
/// locations or species lists longer than one.
pub fn decode_session_name(name: &str) -> ParsedSessionName {
    session_name_regex().captures(name).map_or_else(
        ParsedSessionName::default,
        |caps| ParsedSessionName {
            location: caps[1].to_string(),
            species: caps[2].split('_').map(ToString::to_string).collect(),
            date: caps[3].to_string(),
            valid: true,
        },
    )
}
