//! Session naming: the `location_species_date` codec, species keyword
//! detection and name suggestion.

mod codec;
mod species;
mod suggest;

pub use codec::{ParsedSessionName, decode_session_name, encode_session_name};
pub use species::{SpeciesEntry, SpeciesMap, default_species_map, detect_species, load_species_map};
pub use suggest::{NameSuggestion, infer_location, suggest_session_name};
