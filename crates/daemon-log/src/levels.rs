//! crates/daemon-log/src/levels.rs
//! Severity ranks, from fatal (0) to verbose trace (9).

use std::fmt;

/// How critical a message is. Lower ranks are more severe.
///
/// [`Severity::Fatal`] and [`Severity::Log`] bypass the threshold and
/// category filters. Logging at [`Severity::Fatal`] terminates the process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Severity {
    /// The application cannot continue.
    Fatal = 0,
    /// Always-logged operational message.
    Log = 1,
    /// Something unexpected that the daemon recovered from.
    Warn = 2,
    /// Noteworthy but expected event.
    Notice = 3,
    /// Progress and status updates.
    Status = 4,
    /// General information.
    Info = 5,
    /// Extra detail on informational events.
    Detail = 6,
    /// Debugging output.
    Debug = 7,
    /// Fine-grained tracing.
    Trace = 8,
    /// Everything, including per-item chatter.
    Spam = 9,
}

impl Severity {
    /// Every severity, most severe first.
    pub const ALL: [Self; 10] = [
        Self::Fatal,
        Self::Log,
        Self::Warn,
        Self::Notice,
        Self::Status,
        Self::Info,
        Self::Detail,
        Self::Debug,
        Self::Trace,
        Self::Spam,
    ];

    /// Looks up a severity by numeric rank.
    pub const fn from_rank(rank: u8) -> Option<Self> {
        if (rank as usize) < Self::ALL.len() {
            Some(Self::ALL[rank as usize])
        } else {
            None
        }
    }

    /// Numeric rank, 0 (fatal) through 9.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Whether messages at this severity skip the threshold and category filters.
    pub const fn always_emitted(self) -> bool {
        self.rank() <= 1
    }

    /// Whether logging at this severity terminates the process.
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Fatal)
    }

    /// Lowercase name of the severity.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Log => "log",
            Self::Warn => "warn",
            Self::Notice => "notice",
            Self::Status => "status",
            Self::Info => "info",
            Self::Detail => "detail",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
