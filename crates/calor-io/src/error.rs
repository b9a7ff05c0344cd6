//! Error types for persistence.

use std::fmt;
use std::io;

/// Errors from writing or reading CSV matrices.
#[derive(Debug)]
pub enum PersistError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// A value could not be parsed, or the matrix is empty.
    Parse {
        /// 1-based line number.
        line: usize,
        /// Human-readable description of what went wrong.
        reason: String,
    },
    /// A row has a different number of values than the first row.
    Ragged {
        /// 1-based line number.
        line: usize,
        /// Values in the first row.
        expected: usize,
        /// Values in this row.
        found: usize,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::Ragged {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} values, found {found}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
