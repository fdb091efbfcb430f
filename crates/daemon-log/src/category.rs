//! crates/daemon-log/src/category.rs
//!
//! Subsystem categories and the bitmask used to filter them.
//!
//! Named categories occupy bits 0.. in table order. Bit 31 is reserved for
//! [`Category::Misc`], which every [`CategoryMask`] keeps set.

use std::fmt;

/// Subsystem a message originates from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    /// Configuration loading and validation.
    Config,
    /// Sockets, listeners and peer connections.
    Network,
    /// Persistent storage and the database layer.
    Storage,
    /// Filesystem scanning.
    Scan,
    /// Query evaluation.
    Query,
    /// Input parsers.
    Parser,
    /// Lock acquisition and contention.
    Lock,
    /// Wire protocol handling.
    Protocol,
    /// Transcoding and data transforms.
    Transform,
    /// HTTP front end.
    Http,
    /// Plugin loading and dispatch.
    Plugin,
    /// Start-up, shutdown and the main loop.
    Main,
    /// Catch-all; always enabled.
    Misc,
}

/// Named categories in bit order. [`Category::Misc`] is not listed because it
/// lives on the reserved bit and cannot be selected by name.
const NAMED: [(Category, &str); 12] = [
    (Category::Config, "config"),
    (Category::Network, "network"),
    (Category::Storage, "storage"),
    (Category::Scan, "scan"),
    (Category::Query, "query"),
    (Category::Parser, "parser"),
    (Category::Lock, "lock"),
    (Category::Protocol, "protocol"),
    (Category::Transform, "transform"),
    (Category::Http, "http"),
    (Category::Plugin, "plugin"),
    (Category::Main, "main"),
];

const MISC_BIT: u32 = 1 << 31;

impl Category {
    /// Looks up a named category, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED
            .iter()
            .find(|(_, candidate)| candidate.eq_ignore_ascii_case(name))
            .map(|(category, _)| *category)
    }

    /// Maps a module-path style target (`"daemon::storage::index"`) to a
    /// category by its first segment that names one.
    pub fn from_target(target: &str) -> Option<Self> {
        target.split("::").find_map(Self::from_name)
    }

    /// Bit assigned to this category.
    pub const fn bit(self) -> u32 {
        match self {
            Self::Config => 1 << 0,
            Self::Network => 1 << 1,
            Self::Storage => 1 << 2,
            Self::Scan => 1 << 3,
            Self::Query => 1 << 4,
            Self::Parser => 1 << 5,
            Self::Lock => 1 << 6,
            Self::Protocol => 1 << 7,
            Self::Transform => 1 << 8,
            Self::Http => 1 << 9,
            Self::Plugin => 1 << 10,
            Self::Main => 1 << 11,
            Self::Misc => MISC_BIT,
        }
    }

    /// Lowercase name of the category.
    pub fn as_str(self) -> &'static str {
        if self == Self::Misc {
            return "misc";
        }
        NAMED
            .iter()
            .find(|(category, _)| *category == self)
            .map_or("misc", |(_, name)| name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of enabled categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CategoryMask(u32);

impl CategoryMask {
    /// Only the catch-all category.
    pub const MISC_ONLY: Self = Self(MISC_BIT);
    /// Every category.
    pub const ALL: Self = Self(u32::MAX);

    /// Builds a mask from raw bits, forcing the catch-all bit on.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits | MISC_BIT)
    }

    /// Raw bits of the mask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether `category` is enabled.
    pub const fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    /// Enables `category`.
    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }

    /// Enables every category named in a comma-separated list.
    ///
    /// Names are case-insensitive and surrounding whitespace is ignored, as
    /// are empty entries. Stops at the first unknown name and returns it;
    /// categories enabled before that point stay enabled.
    pub fn extend_from_list(&mut self, list: &str) -> Result<(), String> {
        for token in list.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            match Category::from_name(token) {
                Some(category) => self.insert(category),
                None => return Err(token.to_owned()),
            }
        }
        Ok(())
    }
}

impl Default for CategoryMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for CategoryMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
