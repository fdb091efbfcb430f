//! crates/daemon-log-sink/src/file.rs
//!
//! Rotatable log file handle.
//!
//! Each entry is rendered as `YYYY-MM-DD HH:MM:SS (threadid): message`, with
//! the thread id in eight lowercase hex digits. Fatal entries are followed by
//! a `YYYY-MM-DD HH:MM:SS: Aborting` line. The file is write-only from the
//! logger's point of view and is never read back.

use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use time::macros::format_description;

/// How an existing log file is treated when it is opened.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OpenMode {
    /// Keep prior contents and append new entries.
    #[default]
    Append,
    /// Discard prior contents.
    Truncate,
}

impl OpenMode {
    /// Selects [`OpenMode::Truncate`] when `truncate` is set.
    pub const fn from_truncate(truncate: bool) -> Self {
        if truncate { Self::Truncate } else { Self::Append }
    }
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// An open log file.
///
/// Dropping the value closes the handle.
#[derive(Debug)]
pub struct LogFile {
    file: File,
    path: PathBuf,
    mode: OpenMode,
    generation: u64,
}

impl LogFile {
    /// Opens (creating if necessary) the log file at `path`.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> io::Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            OpenMode::Append => options.append(true),
            OpenMode::Truncate => options.write(true).truncate(true),
        };
        let file = options.open(path)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Path the handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the handle was opened with.
    pub const fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Process-unique number assigned when the handle was opened.
    ///
    /// Two observations with the same generation refer to the same handle.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Appends one entry, plus the `Aborting` line when `aborting` is set.
    pub fn write_entry(
        &mut self,
        timestamp: &str,
        thread_id: u32,
        message: &str,
        aborting: bool,
    ) -> io::Result<()> {
        let line = render_entry(timestamp, thread_id, message, aborting);
        self.file.write_all(line.as_bytes())?;
        self.file.flush()
    }

}

fn render_entry(timestamp: &str, thread_id: u32, message: &str, aborting: bool) -> String {
    let mut line = String::with_capacity(timestamp.len() + message.len() + 16);
    let _ = writeln!(line, "{timestamp} ({thread_id:08x}): {message}");
    if aborting {
        let _ = writeln!(line, "{timestamp}: Aborting");
    }
    line
}

/// Formats `at` as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| "1970-01-01 00:00:00".to_owned())
}

/// Current local time as `YYYY-MM-DD HH:MM:SS`.
///
/// Falls back to UTC when the local offset cannot be determined, which the
/// `time` crate reports on Unix once the process has more than one thread.
pub fn timestamp_now() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_timestamp(now)
}
