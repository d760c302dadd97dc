//! Error types for Retrovue Core
//!
//! Playback operations never fail; these errors only surface at the edges,
//! when a catalog dataset or a configuration is loaded.

use thiserror::Error;

/// Result type alias for catalog and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Error, Debug)]
pub enum Error {
    // Catalog errors
    #[error("Failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("Invalid media URL for {slug}: {source}")]
    InvalidMediaUrl {
        slug: String,
        source: url::ParseError,
    },

    #[error("Duplicate video id in catalog: {0}")]
    DuplicateVideo(String),

    #[error("Unknown video: {0}")]
    UnknownVideo(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Returns true if the caller can carry on with a fallback
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnknownVideo(_) | Error::InvalidConfig(_))
    }

    /// Stable error code for logs and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::CatalogParse(_) => "CATALOG_PARSE",
            Error::InvalidMediaUrl { .. } => "INVALID_MEDIA_URL",
            Error::DuplicateVideo(_) => "DUPLICATE_VIDEO",
            Error::UnknownVideo(_) => "UNKNOWN_VIDEO",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) => "IO",
        }
    }
}
