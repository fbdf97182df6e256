use thiserror::Error;

use disc_list_core::ImageError;
use disc_list_lib::CatalogError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog build, sort or settings failure
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// icon.sys decoding failure
    #[error("{0}")]
    Image(#[from] ImageError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
