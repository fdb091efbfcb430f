//! crates/daemon-log/src/destination.rs
//! Output destinations as independent on/off bits.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::LoggerError;

/// Set of active destinations.
///
/// # Examples
///
/// ```
/// use daemon_log::Destinations;
///
/// let dest: Destinations = "console,file".parse().unwrap();
/// assert!(dest.contains(Destinations::FILE));
/// assert!(!dest.contains(Destinations::SYSLOG));
/// assert_eq!(dest.to_string(), "console,file");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Destinations(u8);

const NAMES: [(Destinations, &str); 3] = [
    (Destinations::CONSOLE, "console"),
    (Destinations::SYSLOG, "syslog"),
    (Destinations::FILE, "file"),
];

impl Destinations {
    /// No destinations.
    pub const NONE: Self = Self(0);
    /// Standard error (or the configured console writer).
    pub const CONSOLE: Self = Self(0x1);
    /// The system log.
    pub const SYSLOG: Self = Self(0x2);
    /// The log file.
    pub const FILE: Self = Self(0x4);

    /// Raw bits of the set.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every destination in `other` is active.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Whether no destination is active.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Activates the destinations in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Deactivates the destinations in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Returns the set without the destinations in `other`.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for Destinations {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Destinations {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for Destinations {
    type Err = LoggerError;

    /// Parses a comma-separated list such as `"console,syslog"`.
    fn from_str(list: &str) -> Result<Self, Self::Err> {
        let mut parsed = Self::NONE;
        for token in list.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            let dest = NAMES
                .iter()
                .find(|(_, name)| name.eq_ignore_ascii_case(token))
                .map(|(dest, _)| *dest)
                .ok_or_else(|| LoggerError::UnknownDestination(token.to_owned()))?;
            parsed.insert(dest);
        }
        Ok(parsed)
    }
}

impl TryFrom<String> for Destinations {
    type Error = LoggerError;

    fn try_from(list: String) -> Result<Self, Self::Error> {
        list.parse()
    }
}

impl From<Destinations> for String {
    fn from(dest: Destinations) -> Self {
        dest.to_string()
    }
}

impl fmt::Display for Destinations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (dest, name) in NAMES {
            if self.contains(dest) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
