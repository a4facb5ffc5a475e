//! Error types for the cardiq-core library.

use thiserror::Error;

/// Main error type for the cardiq library.
#[derive(Error, Debug)]
pub enum CardiqError {
    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to statement field extraction.
///
/// Only [`ExtractionError::EmptyDocument`] crosses the engine boundary as a
/// failure; a candidate that fails normalization is simply dropped, and an
/// unresolved field is reported as an absent value, not an error.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document text is blank or whitespace-only.
    #[error("document text is empty or unreadable")]
    EmptyDocument,
}

/// Errors related to bank profile configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse the config file.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A bank-specific field template is not a valid regex.
    #[error("invalid template for field {field} in bank {bank}: {source}")]
    Template {
        bank: String,
        field: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for the cardiq library.
pub type Result<T> = std::result::Result<T, CardiqError>;
