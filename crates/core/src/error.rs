//! Error types for bn-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.
//! The navigator-facing variants (`Config`, `Listing`, `Transfer`, `Delete`,
//! `IllegalBack`) decide whether a failure ends the session or becomes an
//! operation log entry.

use thiserror::Error;

/// Result type alias for bn-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bn-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Backend listing failed
    #[error("{0}")]
    Listing(String),

    /// Upload or download failed
    #[error("{0}")]
    Transfer(String),

    /// Delete failed
    #[error("{0}")]
    Delete(String),

    /// Attempted to go back from the root prefix
    #[error("Cannot go back from the root prefix")]
    IllegalBack,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,                          // UsageError
            Error::Config(_) | Error::TomlParse(_) => 2,         // UsageError
            Error::Network(_) | Error::Listing(_) => 3,          // NetworkError
            Error::Auth(_) => 4,                                 // AuthError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            _ => 1,                                              // GeneralError
        }
    }

    /// Whether the navigator keeps running after this error
    ///
    /// Per-item operation failures are turned into log entries; everything
    /// else ends the session.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Error::Transfer(_) | Error::Delete(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Listing("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::ProfileNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Transfer("test".into()).exit_code(), 1);
        assert_eq!(Error::IllegalBack.exit_code(), 1);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::ProfileNotFound("dev".into());
        assert_eq!(err.to_string(), "Profile not found: dev");

        let err = Error::Transfer("connection reset".into());
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_only_item_failures_are_recoverable() {
        assert!(Error::Transfer("x".into()).is_recoverable());
        assert!(Error::Delete("x".into()).is_recoverable());
        assert!(!Error::Listing("x".into()).is_recoverable());
        assert!(!Error::Config("x".into()).is_recoverable());
        assert!(!Error::IllegalBack.is_recoverable());
    }
}
