// cellvm-host - Error types for the host API
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Host-level errors: configuration, IO, encoding and value conversion.
//!
//! Failures of the code being executed are not errors here. They are
//! reported through the exceptional state of the resulting context and the
//! error body of a [`Response`](crate::Response).

use std::path::PathBuf;

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the host API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Configuration text is not valid
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Response could not be rendered as JSON
    #[error("failed to encode response: {0}")]
    Json(#[from] serde_json::Error),
    /// A value has the wrong type for the requested Rust type
    #[error("type error: expected {expected}, got {got}")]
    Conversion {
        expected: &'static str,
        got: &'static str,
    },
    /// A long does not fit the requested Rust integer type
    #[error("integer {value} out of range for {target}")]
    OutOfRange { value: i64, target: &'static str },
    /// An unsigned Rust integer does not fit a long
    #[error("integer {value} out of range for {target}")]
    TooLarge { value: u64, target: &'static str },
}

impl Error {
    pub fn conversion(expected: &'static str, got: &'static str) -> Self {
        Error::Conversion { expected, got }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
