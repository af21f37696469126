//! Runtime error types for the tape machine
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to parse errors).
//!
//! All runtime errors are fatal: execution stops at the first one, and any
//! output already written stays written.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// `.` on a cell outside the printable range
    #[error("Display of Dismay error: cell[{cell}] = {value} is not in printable range")]
    DisplayOfDismay {
        cell: usize,
        value: u8,
        location: SourceLocation,
    },

    /// `,` after the input stream ended
    #[error("Input error: no input available")]
    InputExhausted { location: SourceLocation },

    /// A literal character that is not an operator or whitespace
    #[error("Unknown operation symbol '{symbol}' encountered in literal (depth {depth}) at {location}")]
    UnknownOperator {
        symbol: char,
        depth: usize,
        location: SourceLocation,
    },

    /// Block tree deeper than the configured limit
    #[error("Blocks nested deeper than {limit} levels at {location}")]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },

    /// Reading input or writing output failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Snapshot history limit exceeded
    #[error("Snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// Stepping past either end of the recorded history
    #[error("History operation failed: {message}")]
    HistoryOperationFailed { message: String },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::DisplayOfDismay { location, .. } => Some(location),
            RuntimeError::InputExhausted { location } => Some(location),
            RuntimeError::UnknownOperator { location, .. } => Some(location),
            RuntimeError::NestingTooDeep { location, .. } => Some(location),
            RuntimeError::Io { .. } => None,
            RuntimeError::SnapshotLimitExceeded { .. } => None,
            RuntimeError::HistoryOperationFailed { .. } => None,
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Io {
            message: err.to_string(),
        }
    }
}
