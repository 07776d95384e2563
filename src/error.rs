use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing to or rotating a rolling log.
#[derive(Error, Debug)]
pub enum WriterError {
    /// Directory or target file could not be opened
    #[error("cannot open file {}: {source}", path.display())]
    CannotOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid path for the logical log file
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A timestamp tail that does not parse under the configured pattern
    #[error("cannot parse tail {tail:?} with time pattern {pattern:?}")]
    UnparsableTail { tail: String, pattern: String },

    /// I/O error when interacting with the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WriterError>;
