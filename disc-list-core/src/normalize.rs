//! Candidate validation.

use crate::EngineConfig;
use crate::identifier::{Candidate, IdSource, TitleId, is_conforming, is_qualified};

/// Accept a candidate as a [`TitleId`] if it satisfies the identifier grammar.
///
/// Any structurally valid candidate must be exactly 11 characters in
/// `AAAA_BBB.CC` form. Filename-sourced candidates may additionally carry a
/// 12th qualifier character when `allow_filename_qualifier` is set.
///
/// Candidates read from the image are uppercased before the check; filename
/// candidates keep the case the probe gave them, which follows
/// `uppercase_filename_ids`. A rejected candidate is a miss, not an error.
pub fn normalize(candidate: &Candidate, config: &EngineConfig) -> Option<TitleId> {
    if !candidate.valid {
        return None;
    }

    let from_filename = candidate.source == IdSource::Filename;
    let value = if from_filename {
        candidate.value.clone()
    } else {
        candidate.value.to_ascii_uppercase()
    };

    if is_conforming(&value) {
        return Some(TitleId::new_unchecked(value));
    }

    if from_filename && config.allow_filename_qualifier && is_qualified(&value) {
        return Some(TitleId::new_unchecked(value));
    }

    None
}
