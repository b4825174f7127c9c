//! Error types for bucketops-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

use crate::traits::DeleteOutcome;

/// Result type alias for bucketops-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bucketops-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key pattern failed to compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Local file could not be opened or is not a regular file
    #[error("Cannot read local file {0}")]
    LocalFile(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or service error
    #[error("Network error: {0}")]
    Network(String),

    /// A batch delete failed after earlier batches were answered
    #[error("{source} ({} object(s) already deleted)", .outcome.deleted.len())]
    PartialDelete {
        outcome: DeleteOutcome,
        #[source]
        source: Box<Error>,
    },

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPattern { .. } => 2, // UsageError
            Error::Config(_) | Error::InvalidUrl(_) | Error::TomlParse(_) => 2, // UsageError
            Error::Network(_) => 3,  // NetworkError
            Error::Auth(_) => 4,     // AuthError
            Error::NotFound(_) => 5, // NotFound
            Error::PartialDelete { source, .. } => source.exit_code(),
            _ => 1, // GeneralError
        }
    }
}
