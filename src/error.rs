//! Error types for aligned_log.

use std::fmt;
use std::io;

/// Result type alias for aligned_log operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for aligned_log operations.
///
/// Only two things can go wrong while handling an event: a nested mapping
/// value fails to encode, or the destination rejects the write. Either way the
/// event is considered undelivered and the caller decides what to do next.
#[derive(Debug)]
pub enum Error {
    /// The output destination rejected a write.
    Io(io::Error),
    /// A nested attribute value could not be encoded as JSON.
    Encoding(serde_json::Error),
    /// A time format contains a directive chrono does not understand.
    InvalidTimeFormat(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Encoding(e) => write!(f, "cannot encode attribute value: {e}"),
            Self::InvalidTimeFormat(s) => write!(f, "invalid time format: {s:?}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encoding(e) => Some(e),
            Self::InvalidTimeFormat(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Encoding(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidTimeFormat("%Q".to_string());
        assert!(err.to_string().contains("invalid time format"));
        assert!(err.to_string().contains("%Q"));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(json_err);
        assert!(err.to_string().starts_with("cannot encode attribute value"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.source().is_some());
    }
}
