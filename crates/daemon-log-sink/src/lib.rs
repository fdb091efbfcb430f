#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/daemon-log-sink/src/lib.rs
//!
//! # Overview
//!
//! `daemon-log-sink` holds the output primitives the daemon logger fans
//! messages out to. Everything here is destination-specific and knows nothing
//! about severity thresholds or category masks; filtering and locking live
//! in the `daemon-log` crate.
//!
//! # Design
//!
//! - [`syslog`] wraps `openlog(3)`/`syslog(3)` behind the [`SystemLog`]
//!   trait. The connection is opened lazily and at most once per process.
//! - [`file`] owns the rotatable log file handle and renders the
//!   `YYYY-MM-DD HH:MM:SS (threadid): message` line format.
//! - [`thread_id`] derives the numeric thread identifier printed in file
//!   lines.
//!
//! # Invariants
//!
//! - A [`LogFile`] writes each entry (including the trailing `Aborting` line
//!   for fatal messages) with a single `write_all`, so entries are never split
//!   when the caller serializes access.
//! - [`SyslogPriority::for_severity`] is a fixed table; several severities
//!   collapse onto the same priority.
//!
//! # Examples
//!
//! ```
//! use daemon_log_sink::SyslogPriority;
//!
//! assert_eq!(SyslogPriority::for_severity(0), SyslogPriority::Alert);
//! assert_eq!(SyslogPriority::for_severity(4), SyslogPriority::Notice);
//! assert_eq!(SyslogPriority::for_severity(42), SyslogPriority::Debug);
//! ```

pub mod file;
pub mod syslog;
pub mod thread_id;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use file::{LogFile, OpenMode, format_timestamp, timestamp_now};
pub use syslog::{Syslog, SyslogConfig, SyslogPriority, SystemLog};
pub use thread_id::current_thread_id;
