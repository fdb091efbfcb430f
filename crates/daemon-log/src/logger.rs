//! crates/daemon-log/src/logger.rs
//!
//! The process-wide logger.
//!
//! # Locking
//!
//! Two locks guard the logger and are never held at the same time:
//!
//! - the state mutex, covering destinations, the file handle, the truncate
//!   flag and the console writer, held while a message is written out;
//! - the active-thread set ([`ActiveThreads`]), held only long enough to add,
//!   check or remove the calling thread.
//!
//! The threshold and category mask are mirrored in atomics. The filter reads
//! them without the state lock, so a log call issued while that lock is held
//! (from a console writer or a `Display` impl) reaches the re-entrancy check
//! instead of deadlocking.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use daemon_log_sink::{
    LogFile, OpenMode, Syslog, SyslogConfig, SyslogPriority, SystemLog, current_thread_id,
    timestamp_now,
};

use crate::category::{Category, CategoryMask};
use crate::config::{DEFAULT_THRESHOLD, LoggerConfig};
use crate::destination::Destinations;
use crate::error::{LoggerError, LoggerResult};
use crate::levels::Severity;
use crate::reentrancy::{ActiveThreads, Entry};

/// Exit status used when a fatal message terminates the process.
pub const FATAL_EXIT_CODE: i32 = 1;

struct State {
    destinations: Destinations,
    file: Option<LogFile>,
    file_path: Option<PathBuf>,
    truncate: bool,
    console: Box<dyn Write + Send>,
}

impl State {
    /// Replaces the file handle with a fresh one for `path`.
    ///
    /// On failure the file destination is dropped so the bitmask never
    /// advertises a file that is not open.
    fn open_file(&mut self, path: &Path, mode: OpenMode) -> io::Result<()> {
        self.file = None;
        self.file_path = Some(path.to_path_buf());
        match LogFile::open(path, mode) {
            Ok(file) => {
                self.file = Some(file);
                Ok(())
            }
            Err(error) => {
                self.destinations.remove(Destinations::FILE);
                Err(error)
            }
        }
    }
}

/// Level- and category-filtered logger fanning out to the console, a log
/// file and the system log.
///
/// Construct one per daemon with [`Logger::builder`] and share it (usually
/// behind an [`Arc`](std::sync::Arc)). Every instance sends system log
/// traffic through the single process-wide syslog connection.
///
/// # Examples
///
/// ```
/// use daemon_log::{Category, Destinations, Logger, Severity};
///
/// let logger = Logger::builder()
///     .threshold(5)
///     .destinations(Destinations::NONE)
///     .build()
///     .unwrap();
///
/// assert!(logger.enabled(Severity::Info, Category::Storage));
/// assert!(!logger.enabled(Severity::Debug, Category::Storage));
/// logger.log(Severity::Info, Category::Storage, "index rebuilt");
/// ```
pub struct Logger {
    state: Mutex<State>,
    threshold: AtomicU8,
    categories: AtomicU32,
    active: ActiveThreads,
    syslog: Box<dyn SystemLog>,
}

impl Logger {
    /// Starts building a logger.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Builds a logger from `config`, writing to stderr and syslog(3).
    pub fn from_config(config: &LoggerConfig) -> LoggerResult<Self> {
        Self::builder().config(config).build()
    }

    /// Whether a message at `severity` in `category` passes the filters.
    ///
    /// Fatal and log-level messages always pass.
    pub fn enabled(&self, severity: Severity, category: Category) -> bool {
        if severity.always_emitted() {
            return true;
        }
        severity.rank() <= self.threshold.load(Ordering::Relaxed)
            && self.category_mask().contains(category)
    }

    /// Logs `message`.
    ///
    /// Filtered messages are dropped. A call made by a thread that is already
    /// inside `log` is dropped too, except for fatal messages, which go to the
    /// system log alone before the process exits. Fatal messages always reach
    /// the console and terminate the process with [`FATAL_EXIT_CODE`].
    pub fn log(&self, severity: Severity, category: Category, message: impl fmt::Display) {
        if !self.enabled(severity, category) {
            return;
        }

        let guard = match self.active.enter() {
            Entry::Entered(guard) => guard,
            Entry::Reentered => {
                if severity.is_fatal() {
                    let text = message.to_string();
                    self.syslog
                        .send(SyslogPriority::for_severity(0), trim_newline(&text));
                    process::exit(FATAL_EXIT_CODE);
                }
                return;
            }
        };

        let text = message.to_string();
        self.emit(severity, trim_newline(&text));
        drop(guard);

        if severity.is_fatal() {
            process::exit(FATAL_EXIT_CODE);
        }
    }

    /// Logs `message` at [`Severity::Fatal`] and terminates the process.
    pub fn fatal(&self, category: Category, message: impl fmt::Display) -> ! {
        self.log(Severity::Fatal, category, message);
        process::exit(FATAL_EXIT_CODE)
    }

    fn emit(&self, severity: Severity, text: &str) {
        let mut state = self.lock_state();
        let aborting = severity.is_fatal();

        if severity.always_emitted() || state.destinations.contains(Destinations::SYSLOG) {
            self.syslog
                .send(SyslogPriority::for_severity(severity.rank()), text);
        }

        if state.destinations.contains(Destinations::FILE) {
            if let Some(file) = state.file.as_mut() {
                let _ = file.write_entry(&timestamp_now(), current_thread_id(), text, aborting);
            }
        }

        if aborting || state.destinations.contains(Destinations::CONSOLE) {
            let mut line = String::with_capacity(text.len() + 10);
            line.push_str(text);
            line.push('\n');
            if aborting {
                line.push_str("Aborting\n");
            }
            let _ = state.console.write_all(line.as_bytes());
            let _ = state.console.flush();
        }
    }

    /// Sets the highest severity rank that filtered messages may have.
    pub fn set_severity_threshold(&self, level: u8) {
        let _state = self.lock_state();
        self.threshold.store(level, Ordering::Relaxed);
    }

    /// Current severity threshold.
    pub fn severity_threshold(&self) -> u8 {
        self.threshold.load(Ordering::Relaxed)
    }

    /// Currently enabled categories.
    pub fn category_mask(&self) -> CategoryMask {
        CategoryMask::from_bits(self.categories.load(Ordering::Relaxed))
    }

    /// Currently active destinations.
    pub fn destinations(&self) -> Destinations {
        self.lock_state().destinations
    }

    /// Replaces the active destinations.
    ///
    /// Setting the current value again does nothing. Dropping the file
    /// destination closes the log file; writes stay disabled until a file is
    /// set again with [`set_log_file`](Self::set_log_file).
    pub fn set_destinations(&self, destinations: Destinations) {
        let mut state = self.lock_state();
        if state.destinations == destinations {
            return;
        }
        if state.destinations.contains(Destinations::FILE)
            && !destinations.contains(Destinations::FILE)
        {
            state.file = None;
        }
        state.destinations = destinations;
    }

    /// Opens `path` as the log file and activates the file destination.
    ///
    /// Any open file is closed first. The file is truncated when
    /// [`set_truncate_on_open`](Self::set_truncate_on_open) is in effect and
    /// appended to otherwise. On failure the file destination is removed and
    /// the failure is reported to the system log.
    pub fn set_log_file(&self, path: impl AsRef<Path>) -> LoggerResult<()> {
        let path = path.as_ref();
        let mut state = self.lock_state();
        let mode = OpenMode::from_truncate(state.truncate);
        let result = state.open_file(path, mode);
        if result.is_ok() {
            state.destinations.insert(Destinations::FILE);
        }
        drop(state);
        self.report_open(path, result)
    }

    fn report_open(&self, path: &Path, result: io::Result<()>) -> LoggerResult<()> {
        result.map_err(|source| {
            let error = LoggerError::OpenLogFile {
                path: path.to_path_buf(),
                source,
            };
            self.syslog
                .send(SyslogPriority::for_severity(1), &error.to_string());
            error
        })
    }

    /// Path of the current log file, if one has been set.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.lock_state().file_path.clone()
    }

    /// Generation of the open log file handle, or `None` when closed.
    ///
    /// The value changes every time the file is (re)opened.
    pub fn log_file_generation(&self) -> Option<u64> {
        self.lock_state().file.as_ref().map(LogFile::generation)
    }

    /// Whether log files are truncated when opened.
    pub fn truncate_on_open(&self) -> bool {
        self.lock_state().truncate
    }

    /// Chooses between truncating and appending when the log file is opened.
    ///
    /// When the flag changes while a file is open, the file is reopened under
    /// the new mode, so enabling truncation empties the current file.
    pub fn set_truncate_on_open(&self, truncate: bool) -> LoggerResult<()> {
        let mut state = self.lock_state();
        if state.truncate == truncate {
            return Ok(());
        }
        state.truncate = truncate;

        let path = match (&state.file, &state.file_path) {
            (Some(_), Some(path)) => path.clone(),
            _ => return Ok(()),
        };
        let result = state.open_file(&path, OpenMode::from_truncate(truncate));
        drop(state);
        self.report_open(&path, result)
    }

    /// Closes and reopens the log file in append mode, for log rotation.
    ///
    /// Does nothing unless the file destination is active. If the file cannot
    /// be reopened, output falls back to the system log.
    pub fn reopen_log_file(&self) -> LoggerResult<()> {
        let mut state = self.lock_state();
        if !state.destinations.contains(Destinations::FILE) {
            return Ok(());
        }
        let Some(path) = state.file_path.clone() else {
            return Ok(());
        };

        match state.open_file(&path, OpenMode::Append) {
            Ok(()) => {
                drop(state);
                self.log(Severity::Log, Category::Misc, "Rotated logs");
                Ok(())
            }
            Err(source) => {
                state.destinations.insert(Destinations::SYSLOG);
                drop(state);
                self.log(
                    Severity::Log,
                    Category::Misc,
                    format_args!("Could not rotate log file: {source}"),
                );
                Err(LoggerError::OpenLogFile { path, source })
            }
        }
    }

    /// Restricts filtered output to the categories in a comma-separated list.
    ///
    /// The mask is reset to the catch-all category before the list is
    /// applied. An unknown name stops parsing; categories listed before it
    /// stay enabled.
    pub fn set_category_filter(&self, list: &str) -> LoggerResult<()> {
        let mut mask = CategoryMask::MISC_ONLY;
        let outcome = mask.extend_from_list(list);
        {
            let _state = self.lock_state();
            self.categories.store(mask.bits(), Ordering::Relaxed);
        }

        match outcome {
            Ok(()) => {
                self.log(
                    Severity::Info,
                    Category::Misc,
                    format_args!("Category mask is {mask}"),
                );
                Ok(())
            }
            Err(token) => {
                self.log(
                    Severity::Log,
                    Category::Misc,
                    format_args!("Unknown category: {token}"),
                );
                Err(LoggerError::UnknownCategory(token))
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Logger")
            .field("threshold", &self.severity_threshold())
            .field("categories", &self.category_mask())
            .field("destinations", &state.destinations)
            .field("file_path", &state.file_path)
            .field("truncate", &state.truncate)
            .finish_non_exhaustive()
    }
}

fn trim_newline(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}

/// Builder for [`Logger`].
pub struct LoggerBuilder {
    threshold: u8,
    categories: Option<String>,
    destinations: Destinations,
    log_file: Option<PathBuf>,
    truncate: bool,
    syslog_config: SyslogConfig,
    syslog: Option<Box<dyn SystemLog>>,
    console: Option<Box<dyn Write + Send>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            categories: None,
            destinations: Destinations::CONSOLE,
            log_file: None,
            truncate: false,
            syslog_config: SyslogConfig::default(),
            syslog: None,
            console: None,
        }
    }
}

impl LoggerBuilder {
    /// Copies every setting from `config`.
    pub fn config(mut self, config: &LoggerConfig) -> Self {
        self.threshold = config.threshold;
        self.categories.clone_from(&config.categories);
        self.destinations = config.destinations;
        self.log_file.clone_from(&config.log_file);
        self.truncate = config.truncate;
        self.syslog_config = config.syslog_config();
        self
    }

    /// Initial severity threshold.
    pub fn threshold(mut self, level: u8) -> Self {
        self.threshold = level;
        self
    }

    /// Initial category filter, as accepted by [`Logger::set_category_filter`].
    pub fn categories(mut self, list: impl Into<String>) -> Self {
        self.categories = Some(list.into());
        self
    }

    /// Initially active destinations.
    pub fn destinations(mut self, destinations: Destinations) -> Self {
        self.destinations = destinations;
        self
    }

    /// Log file to open when the logger is built. Opening it activates the
    /// file destination.
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Truncate instead of append when opening the log file.
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Identity for the default syslog backend.
    pub fn syslog_config(mut self, config: SyslogConfig) -> Self {
        self.syslog_config = config;
        self
    }

    /// Replaces the syslog(3) backend.
    pub fn syslog(mut self, syslog: impl SystemLog + 'static) -> Self {
        self.syslog = Some(Box::new(syslog));
        self
    }

    /// Replaces standard error as the console destination.
    pub fn console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Some(Box::new(console));
        self
    }

    /// Builds the logger, applying the category filter and opening the log
    /// file if configured.
    ///
    /// Requesting [`Destinations::FILE`] without a log file path is an error.
    pub fn build(self) -> LoggerResult<Logger> {
        if self.destinations.contains(Destinations::FILE) && self.log_file.is_none() {
            return Err(LoggerError::MissingLogFile);
        }

        let syslog: Box<dyn SystemLog> = match self.syslog {
            Some(syslog) => syslog,
            None => Box::new(Syslog::new(self.syslog_config)),
        };
        let console: Box<dyn Write + Send> = match self.console {
            Some(console) => console,
            None => Box::new(io::stderr()),
        };

        let logger = Logger {
            state: Mutex::new(State {
                // The file bit is set once the file actually opens.
                destinations: self.destinations.without(Destinations::FILE),
                file: None,
                file_path: None,
                truncate: self.truncate,
                console,
            }),
            threshold: AtomicU8::new(self.threshold),
            categories: AtomicU32::new(CategoryMask::ALL.bits()),
            active: ActiveThreads::new(),
            syslog,
        };

        if let Some(list) = self.categories.as_deref() {
            logger.set_category_filter(list)?;
        }
        if let Some(path) = self.log_file.as_deref() {
            logger.set_log_file(path)?;
        }
        Ok(logger)
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("threshold", &self.threshold)
            .field("categories", &self.categories)
            .field("destinations", &self.destinations)
            .field("log_file", &self.log_file)
            .field("truncate", &self.truncate)
            .field("syslog_config", &self.syslog_config)
            .finish_non_exhaustive()
    }
}
