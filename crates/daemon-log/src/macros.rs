//! crates/daemon-log/src/macros.rs
//! Formatting macros that skip argument formatting for filtered messages.

/// Logs a formatted message at an explicit severity and category.
///
/// The arguments are only formatted when [`Logger::enabled`](crate::Logger::enabled)
/// accepts the message.
///
/// # Example
/// ```
/// use daemon_log::{Category, Destinations, Logger, Severity, dlog};
///
/// let logger = Logger::builder().destinations(Destinations::NONE).build().unwrap();
/// dlog!(logger, Severity::Warn, Category::Network, "peer {} timed out", "10.0.0.7");
/// ```
#[macro_export]
macro_rules! dlog {
    ($logger:expr, $severity:expr, $category:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let severity: $crate::Severity = $severity;
        let category: $crate::Category = $category;
        if logger.enabled(severity, category) {
            logger.log(severity, category, ::std::format_args!($($arg)+));
        }
    }};
}

/// Logs at [`Severity::Fatal`](crate::Severity::Fatal) and terminates the process.
///
/// # Example
/// ```ignore
/// log_fatal!(logger, Category::Storage, "database {} is corrupt", path.display());
/// ```
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::Logger::fatal(&$logger, $category, ::std::format_args!($($arg)+))
    };
}

/// Logs at [`Severity::Log`](crate::Severity::Log), which is never filtered.
///
/// # Example
/// ```ignore
/// log_error!(logger, Category::Network, "bind failed: {}", err);
/// ```
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::dlog!($logger, $crate::Severity::Log, $category, $($arg)+)
    };
}

/// Logs at [`Severity::Warn`](crate::Severity::Warn).
///
/// # Example
/// ```ignore
/// log_warn!(logger, Category::Config, "ignoring unknown key {}", key);
/// ```
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::dlog!($logger, $crate::Severity::Warn, $category, $($arg)+)
    };
}

/// Logs at [`Severity::Info`](crate::Severity::Info).
///
/// # Example
/// ```ignore
/// log_info!(logger, Category::Scan, "scanned {} files", count);
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::dlog!($logger, $crate::Severity::Info, $category, $($arg)+)
    };
}

/// Logs at [`Severity::Debug`](crate::Severity::Debug).
///
/// # Example
/// ```ignore
/// log_debug!(logger, Category::Lock, "waiting on {}", name);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::dlog!($logger, $crate::Severity::Debug, $category, $($arg)+)
    };
}
