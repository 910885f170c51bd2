// Error types for opuscaf
//
// Every decode/encode operation returns one of these kinds. Nothing recovers
// locally: the first error aborts the whole conversion.

use thiserror::Error;

/// Result type alias for opuscaf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for opuscaf
#[derive(Error, Debug)]
pub enum Error {
    /// Magic bytes, page type or payload layout did not match what the
    /// container requires
    #[error("stream validation failed: {0}")]
    StreamValidation(String),

    /// Short read on a fixed-size structure, or an exhausted varint source
    #[error("incomplete data: {0}")]
    IncompleteData(String),

    /// In-memory model disagrees with itself (e.g. packet table counts)
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Underlying read/write/seek failure
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl Error {
    /// Create a stream validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::StreamValidation(msg.into())
    }

    /// Create an incomplete data error
    pub fn incomplete<S: Into<String>>(msg: S) -> Self {
        Error::IncompleteData(msg.into())
    }

    /// Create an invariant violation error
    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        Error::InvariantViolation(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::IncompleteData(e.to_string()),
            _ => Error::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unexpected_eof_maps_to_incomplete() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "short").into();
        assert!(matches!(err, Error::IncompleteData(_)));
    }

    #[test]
    fn test_other_io_errors_stay_io() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
