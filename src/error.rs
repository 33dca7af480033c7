//! Error types for streamzip

use std::io;

/// Result type for streamzip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while writing an archive
#[derive(Debug)]
pub enum Error {
    /// Entry options failed validation before any I/O occurred
    InvalidOptions(String),
    /// The archive was used in a way its lifecycle forbids
    /// (`add_entry` after `finalize`, or `finalize` called twice)
    IllegalState(String),
    /// A `finalize` override referenced an entry that doesn't exist, or
    /// tried to change a frozen physical field
    OverrideInvalid(String),
    /// The entry source errored while being read
    Source(io::Error),
    /// The output sink errored while being written to
    Sink(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidOptions(msg) => write!(f, "invalid entry options: {}", msg),
            Error::IllegalState(msg) => write!(f, "illegal archive state: {}", msg),
            Error::OverrideInvalid(msg) => write!(f, "invalid finalize override: {}", msg),
            Error::Source(e) => write!(f, "entry source error: {}", e),
            Error::Sink(e) => write!(f, "output sink error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(e) | Error::Sink(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    /// I/O errors encountered outside an explicit source/sink context
    /// (e.g. writing the central directory) are attributed to the sink.
    fn from(err: io::Error) -> Self {
        Error::Sink(err)
    }
}
