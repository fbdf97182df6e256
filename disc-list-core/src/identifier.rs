//! Title identifier types and the `AAAA_BBB.CC` grammar.

use std::fmt;

/// Length of a canonical title identifier (`SLUS_203.12`).
pub const ID_LEN: usize = 11;

/// Length of a filename-sourced identifier carrying a trailing qualifier
/// character (`SLPM_650.51A`).
pub const QUALIFIED_ID_LEN: usize = 12;

/// Position of the `_` separator.
pub const SEPARATOR_INDEX: usize = 4;

/// Position of the `.` separator.
pub const DOT_INDEX: usize = 8;

/// Which resolution stage produced an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSource {
    /// The filename already follows the identifier convention.
    Filename,
    /// Found in the boot executable's ISO 9660 directory record.
    Stream,
    /// Taken from a `BOOT =` declaration in `SYSTEM.CNF`.
    BootMarker,
    /// Derived from the filename because nothing else matched.
    Synthetic,
}

impl IdSource {
    /// All stages in priority order.
    pub const ALL: [IdSource; 4] = [
        IdSource::Filename,
        IdSource::Stream,
        IdSource::BootMarker,
        IdSource::Synthetic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Filename => "filename",
            Self::Stream => "stream",
            Self::BootMarker => "boot marker",
            Self::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for IdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value proposed by one resolution stage, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub source: IdSource,
    /// Whether the stage's own structural checks passed.
    pub valid: bool,
}

impl Candidate {
    pub fn new(value: impl Into<String>, source: IdSource, valid: bool) -> Self {
        Self {
            value: value.into(),
            source,
            valid,
        }
    }
}

/// An accepted title identifier.
///
/// Always exactly [`ID_LEN`] characters matching `AAAA_BBB.CC`, except for
/// filename-sourced identifiers accepted under the relaxed qualifier rule,
/// which are [`QUALIFIED_ID_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TitleId(String);

impl TitleId {
    /// Wrap a value that has already passed the grammar check.
    pub(crate) fn new_unchecked(value: String) -> Self {
        debug_assert!(is_conforming(&value) || is_qualified(&value));
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TitleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when parsing a string that is not a canonical identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a title identifier: '{0}'")]
pub struct IdParseError(pub String);

impl std::str::FromStr for TitleId {
    type Err = IdParseError;

    /// Parse a strict 11-character identifier. Case is preserved.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_conforming(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(IdParseError(s.to_string()))
        }
    }
}

/// Check the strict grammar: 11 ASCII characters, `_` at index 4, `.` at
/// index 8, alphanumeric everywhere else.
pub fn is_conforming(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == ID_LEN
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            SEPARATOR_INDEX => b == b'_',
            DOT_INDEX => b == b'.',
            _ => b.is_ascii_alphanumeric(),
        })
}

/// Check the relaxed grammar: a conforming identifier followed by one
/// alphanumeric qualifier character.
pub fn is_qualified(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == QUALIFIED_ID_LEN
        && bytes[ID_LEN].is_ascii_alphanumeric()
        && is_conforming(&value[..ID_LEN])
}

/// Decode raw candidate bytes as text.
///
/// Invalid UTF-8 sequences become U+FFFD. This never fails; a replaced
/// character is not alphanumeric, so an undecodable candidate simply fails
/// the grammar check downstream.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
#[path = "tests/identifier_tests.rs"]
mod tests;
