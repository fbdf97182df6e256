//! Filename probe: the zero-cost first stage.
//!
//! Images already named after their identifier (`SLUS_203.12.Game.iso`) are
//! resolved without opening the file.

use crate::EngineConfig;
use crate::identifier::{Candidate, DOT_INDEX, ID_LEN, IdSource, QUALIFIED_ID_LEN, SEPARATOR_INDEX};

/// Shortest stem that can carry the convention (`AAAA_BBB.`).
const MIN_STEM_LEN: usize = 9;

/// Check whether a filename stem (extension already stripped) follows the
/// identifier convention, returning the leading identifier if so.
pub fn probe_filename(stem: &str, config: &EngineConfig) -> Option<Candidate> {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < MIN_STEM_LEN || chars[SEPARATOR_INDEX] != '_' || chars[DOT_INDEX] != '.' {
        return None;
    }

    let take = if config.allow_filename_qualifier
        && chars.len() >= QUALIFIED_ID_LEN
        && chars[ID_LEN].is_ascii_alphanumeric()
    {
        QUALIFIED_ID_LEN
    } else {
        ID_LEN
    };

    let mut value: String = chars.iter().take(take).collect();
    if config.uppercase_filename_ids {
        value = value.to_uppercase();
    }

    Some(Candidate::new(value, IdSource::Filename, true))
}
