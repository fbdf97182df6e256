//! Title identifier resolution for PlayStation disc images.
//!
//! Every disc image in a catalog needs a canonical 11-character title
//! identifier (`SLUS_203.12`). The identifier may be spelled out in the
//! filename, buried in the ISO 9660 directory record of the boot executable,
//! declared after a `BOOT =` line in `SYSTEM.CNF`, or missing entirely. The
//! [`Resolver`] tries each location in priority order and falls back to a
//! synthetic identifier derived from the filename, so resolution always
//! succeeds.

pub mod boot_marker;
pub mod error;
pub mod icon_sys;
pub mod identifier;
pub mod normalize;
pub mod platform;
pub mod probe;
pub mod resolver;
pub mod stream;
pub mod synthetic;
pub mod util;

pub use error::ImageError;
pub use identifier::{Candidate, IdSource, TitleId};
pub use platform::{ImageFolder, Platform, PlatformParseError};
pub use resolver::{Resolution, Resolver, resolve_identifier};

/// Default number of bytes scanned per image (5 MiB).
///
/// The boot executable's directory record and `SYSTEM.CNF` both sit within
/// the first few hundred sectors of a disc, so a multi-gigabyte image never
/// needs to be read in full.
pub const DEFAULT_SCAN_BYTE_LIMIT: u64 = 5 * 1024 * 1024;

/// Options that control identifier resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of bytes read from an image when scanning for an
    /// embedded identifier. `None` scans the whole image.
    pub scan_byte_limit: Option<u64>,

    /// Uppercase identifiers taken from the filename.
    pub uppercase_filename_ids: bool,

    /// Accept a 12th alphanumeric qualifier character on filename-sourced
    /// identifiers (`SLPM_123.45A`). Only applies to the filename stage.
    pub allow_filename_qualifier: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_byte_limit: Some(DEFAULT_SCAN_BYTE_LIMIT),
            uppercase_filename_ids: true,
            allow_filename_qualifier: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_byte_limit(mut self, limit: Option<u64>) -> Self {
        self.scan_byte_limit = limit;
        self
    }

    pub fn uppercase_filename_ids(mut self, uppercase: bool) -> Self {
        self.uppercase_filename_ids = uppercase;
        self
    }

    pub fn allow_filename_qualifier(mut self, allow: bool) -> Self {
        self.allow_filename_qualifier = allow;
        self
    }
}
