//! Relog error types.
//!
//! Format mismatches and coercion failures are not errors: detectors decline
//! a line and the dispatcher falls through. Only the I/O edges can fail.

use thiserror::Error;

/// Errors that can occur while relogging a stream.
#[derive(Debug, Error)]
pub enum RelogError {
    #[error("failed to read input: {0}")]
    Io(String),

    #[error("failed to write record: {0}")]
    Sink(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<std::io::Error> for RelogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Convenience alias for relog results.
pub type RelogResult<T> = Result<T, RelogError>;
