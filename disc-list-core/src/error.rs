use thiserror::Error;

/// Errors that can occur while decoding on-disc binary structures.
///
/// Identifier resolution never fails; this type covers the fixed-offset
/// decoders (such as `icon.sys`) and I/O around them.
#[derive(Debug, Error)]
pub enum ImageError {
    /// I/O error while reading the data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data does not have the expected layout or magic
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The data is too small to hold the structure
    #[error("Data too small: expected at least {expected} bytes, got {actual}")]
    TooSmall { expected: u64, actual: u64 },
}

impl ImageError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}
