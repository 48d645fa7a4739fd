//! Fatal parse errors.
//!
//! Per-record problems never surface here; malformed records are skipped
//! or decoded with partial data. Only failures that prevent splitting the
//! input into lines at all are reported, and they abort the whole parse.

use thiserror::Error;

/// Errors that abort a parse with no partial result
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is not valid UTF-8 text
    #[error("Log is not valid UTF-8 text (invalid byte at offset {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },

    /// The log file could not be opened or mapped
    #[error("Failed to read log file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        ParseError::InvalidEncoding {
            valid_up_to: err.valid_up_to(),
        }
    }
}
