//! crates/daemon-log-sink/src/syslog.rs
//!
//! System log backend.
//!
//! Uses libc `openlog`/`syslog` directly rather than pulling in a dedicated
//! syslog crate. The connection is process-wide: `openlog(3)` keeps the ident
//! pointer for the rest of the process, so the first [`Syslog`] to send a
//! message opens it and every later instance shares that connection.

use std::ffi::CString;
use std::sync::OnceLock;

/// Syslog priority levels matching POSIX syslog(3) severity constants.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(i32)]
pub enum SyslogPriority {
    /// System is unusable (LOG_EMERG).
    Emergency = 0,
    /// Action must be taken immediately (LOG_ALERT).
    Alert = 1,
    /// Critical conditions (LOG_CRIT).
    Critical = 2,
    /// Error conditions (LOG_ERR).
    Error = 3,
    /// Warning conditions (LOG_WARNING).
    Warning = 4,
    /// Normal but significant condition (LOG_NOTICE).
    Notice = 5,
    /// Informational messages (LOG_INFO).
    Info = 6,
    /// Debug-level messages (LOG_DEBUG).
    Debug = 7,
}

/// Logger severity rank (0..=9) to syslog priority.
const SEVERITY_PRIORITIES: [SyslogPriority; 10] = [
    SyslogPriority::Alert,
    SyslogPriority::Alert,
    SyslogPriority::Notice,
    SyslogPriority::Notice,
    SyslogPriority::Notice,
    SyslogPriority::Info,
    SyslogPriority::Info,
    SyslogPriority::Info,
    SyslogPriority::Info,
    SyslogPriority::Debug,
];

impl SyslogPriority {
    /// Maps a logger severity rank to the priority handed to syslog(3).
    ///
    /// Ranks past the end of the table are treated as debug output.
    pub const fn for_severity(rank: u8) -> Self {
        if (rank as usize) < SEVERITY_PRIORITIES.len() {
            SEVERITY_PRIORITIES[rank as usize]
        } else {
            Self::Debug
        }
    }
}

/// Default syslog identity.
pub const DEFAULT_SYSLOG_IDENT: &str = "daemon";

/// Identity string handed to `openlog(3)`.
///
/// The facility is always `LOG_DAEMON`.
///
/// # Examples
///
/// ```
/// use daemon_log_sink::SyslogConfig;
///
/// let config = SyslogConfig::new("indexd");
/// assert_eq!(config.ident(), "indexd");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyslogConfig {
    ident: String,
}

impl SyslogConfig {
    /// Creates a configuration that opens syslog as `ident`.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
        }
    }

    /// Returns the identity prefixed to every syslog line.
    pub fn ident(&self) -> &str {
        &self.ident
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SYSLOG_IDENT)
    }
}

/// Destination for messages routed to the system log.
///
/// The logger only ever hands over the rendered message text and a priority;
/// category information is not forwarded.
pub trait SystemLog: Send + Sync {
    /// Emits `message` at `priority`.
    fn send(&self, priority: SyslogPriority, message: &str);
}

/// Ident string of the process-wide syslog connection, set once it is opened.
static CONNECTION: OnceLock<CString> = OnceLock::new();

/// [`SystemLog`] backed by syslog(3).
#[derive(Clone, Debug, Default)]
pub struct Syslog {
    config: SyslogConfig,
}

impl Syslog {
    /// Creates a backend that opens syslog with `config` on first use.
    ///
    /// The process holds a single syslog connection. If another backend has
    /// already opened it, this backend sends through that connection and its
    /// own ident is not used; [`connection_ident`](Self::connection_ident)
    /// reports the ident actually in effect.
    pub fn new(config: SyslogConfig) -> Self {
        Self { config }
    }

    /// Returns the ident this backend would open syslog with.
    pub fn config(&self) -> &SyslogConfig {
        &self.config
    }

    /// Reports whether the process-wide syslog connection has been opened.
    pub fn is_open(&self) -> bool {
        CONNECTION.get().is_some()
    }

    /// Ident of the open process-wide connection, if any.
    pub fn connection_ident() -> Option<&'static str> {
        CONNECTION.get().and_then(|ident| ident.to_str().ok())
    }

    fn ensure_open(&self) {
        CONNECTION.get_or_init(|| {
            let ident = CString::new(self.config.ident())
                .unwrap_or_else(|_| CString::from(c"daemon"));
            open_connection(&ident);
            ident
        });
    }
}

impl SystemLog for Syslog {
    fn send(&self, priority: SyslogPriority, message: &str) {
        self.ensure_open();
        send_message(priority, message);
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn open_connection(ident: &CString) {
    // SAFETY: called once per process from inside a OnceLock initializer. The
    // ident is moved into the static afterwards; CString owns a heap buffer,
    // so the pointer openlog retains stays valid for the process lifetime.
    unsafe {
        libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_DAEMON);
    }
}

#[cfg(not(unix))]
fn open_connection(_ident: &CString) {}

#[cfg(unix)]
#[allow(unsafe_code)]
fn send_message(priority: SyslogPriority, message: &str) {
    // Embedded NULs cannot cross the C boundary; drop the message.
    let Ok(c_message) = CString::new(message) else {
        return;
    };

    // SAFETY: the connection was opened by `ensure_open`. `%s` keeps any
    // `%` in the message from being read as a conversion specifier.
    unsafe {
        libc::syslog(priority as libc::c_int, c"%s".as_ptr(), c_message.as_ptr());
    }
}

#[cfg(not(unix))]
fn send_message(_priority: SyslogPriority, message: &str) {
    use std::io::Write;

    let ident = Syslog::connection_ident().unwrap_or(DEFAULT_SYSLOG_IDENT);
    let _ = writeln!(std::io::stderr(), "{ident}: {message}");
}
