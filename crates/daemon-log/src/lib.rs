#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `daemon_log` is the process-wide logger of a long-running daemon. Messages
//! carry a [`Severity`] and a [`Category`]; the logger filters them against a
//! severity threshold and a category mask and fans the survivors out to the
//! console (standard error), a log file, and the system log.
//!
//! # Design
//!
//! - [`Logger`] owns the mutable state behind one mutex and mirrors the
//!   threshold and category mask in atomics so the filter never locks.
//! - A per-thread re-entrancy guard drops log calls made from inside a log
//!   call (for example from a console writer or a `Display` impl) instead of
//!   deadlocking. A re-entrant fatal message still reaches the system log.
//! - Output primitives (the log file, syslog(3), thread identifiers) live in
//!   the `daemon_log_sink` crate and are re-exported here.
//! - With the `tracing` feature, `LoggerLayer` routes `tracing` events into
//!   the same logger.
//!
//! # Invariants
//!
//! - [`Severity::Fatal`] and [`Severity::Log`] are never filtered and always
//!   reach the system log.
//! - A fatal message is written, flushed, followed by an `Aborting` line, and
//!   the process exits with [`FATAL_EXIT_CODE`].
//! - The file destination is only active while a log file is open.
//! - The catch-all [`Category::Misc`] is always enabled.
//!
//! # Errors
//!
//! Fallible operations return [`LoggerError`]: failures to open the log file,
//! unknown category or destination names, and a file destination requested
//! without a path.
//!
//! # Examples
//!
//! ```
//! use daemon_log::{Category, Destinations, Logger, log_info};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("daemon.log");
//!
//! let logger = Logger::builder()
//!     .threshold(5)
//!     .categories("storage")
//!     .destinations(Destinations::FILE)
//!     .log_file(&path)
//!     .build()
//!     .unwrap();
//!
//! log_info!(logger, Category::Storage, "opened {} shards", 4);
//! log_info!(logger, Category::Network, "filtered out");
//!
//! let contents = std::fs::read_to_string(&path).unwrap();
//! assert!(contents.contains("): opened 4 shards\n"));
//! assert!(!contents.contains("filtered out"));
//! ```

mod category;
mod config;
mod destination;
mod error;
mod levels;
mod logger;
mod macros;
mod reentrancy;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use category::{Category, CategoryMask};
pub use config::{DEFAULT_THRESHOLD, LoggerConfig};
pub use destination::Destinations;
pub use error::{LoggerError, LoggerResult};
pub use levels::Severity;
pub use logger::{FATAL_EXIT_CODE, Logger, LoggerBuilder};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{LoggerLayer, init_tracing, init_tracing_with_filter};

pub use daemon_log_sink::{
    LogFile, OpenMode, Syslog, SyslogConfig, SyslogPriority, SystemLog,
};
