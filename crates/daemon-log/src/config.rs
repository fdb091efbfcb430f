//! crates/daemon-log/src/config.rs
//! Start-up configuration handed over by the daemon's CLI/config loader.

use std::path::PathBuf;

use daemon_log_sink::SyslogConfig;
use daemon_log_sink::syslog::DEFAULT_SYSLOG_IDENT;

use crate::destination::Destinations;

/// Default severity threshold: warnings and above.
pub const DEFAULT_THRESHOLD: u8 = 2;

/// Initial logger settings.
///
/// Applied by [`LoggerBuilder::config`](crate::LoggerBuilder::config) in the
/// order threshold, destinations, truncate flag, category filter, log file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerConfig {
    /// Highest severity rank emitted for filtered messages.
    pub threshold: u8,
    /// Comma-separated category list; `None` enables every category.
    pub categories: Option<String>,
    /// Initially active destinations.
    pub destinations: Destinations,
    /// Log file path, required when [`Destinations::FILE`] is requested.
    pub log_file: Option<PathBuf>,
    /// Truncate the log file on open instead of appending.
    pub truncate: bool,
    /// Identity for the system log, usually the package name.
    pub ident: String,
}

impl LoggerConfig {
    /// Syslog settings derived from [`ident`](Self::ident).
    pub fn syslog_config(&self) -> SyslogConfig {
        SyslogConfig::new(self.ident.clone())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            categories: None,
            destinations: Destinations::CONSOLE,
            log_file: None,
            truncate: false,
            ident: DEFAULT_SYSLOG_IDENT.to_owned(),
        }
    }
}
