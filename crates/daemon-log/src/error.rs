//! crates/daemon-log/src/error.rs
//!
//! Error types for logger configuration.
//!
//! Logging itself never fails from the caller's point of view; only the
//! configuration operations report errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for logger configuration operations.
pub type LoggerResult<T> = Result<T, LoggerError>;

/// Errors reported by logger configuration operations.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The log file could not be opened. The file destination was dropped.
    #[error("Error opening logfile {}: {source}", .path.display())]
    OpenLogFile {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A category filter named a category that does not exist.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    /// A destination list named a destination that does not exist.
    #[error("Unknown destination: {0}")]
    UnknownDestination(String),
    /// The file destination was requested without a log file path.
    #[error("file destination requested without a log file path")]
    MissingLogFile,
}
