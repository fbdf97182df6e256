use std::path::PathBuf;

use disc_list_core::ImageError;

/// Errors that can occur while building or rewriting a catalog.
///
/// Identifier resolution itself never fails; everything here comes from the
/// file system, the conversion step, or configuration around it.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An image could not be opened or read.
    #[error("Cannot read {}: {source}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external converter failed for an image.
    #[error("Conversion of {} failed: {reason}", path.display())]
    ConversionFailure { path: PathBuf, reason: String },

    /// A folder required by the platform profile is missing.
    #[error("{folder} not found at {}", root.display())]
    MissingFolder { folder: String, root: PathBuf },

    #[error("Reference table error: {0}")]
    ReferenceTable(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl CatalogError {
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnreadableSource {
            path: path.into(),
            source,
        }
    }

    pub fn conversion(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConversionFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
