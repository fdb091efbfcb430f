//! crates/daemon-log-sink/src/test_support.rs
//! In-memory doubles for the system log and console destinations.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::syslog::{SyslogPriority, SystemLog};

/// [`SystemLog`] that records every message instead of sending it.
#[derive(Clone, Debug, Default)]
pub struct MemorySyslog {
    entries: Arc<Mutex<Vec<(SyslogPriority, String)>>>,
}

impl MemorySyslog {
    /// Creates an empty recorder. Clones share the same buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every `(priority, message)` recorded so far.
    pub fn entries(&self) -> Vec<(SyslogPriority, String)> {
        self.lock().clone()
    }

    /// Returns the recorded messages without priorities.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|(_, message)| message.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(SyslogPriority, String)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl SystemLog for MemorySyslog {
    fn send(&self, priority: SyslogPriority, message: &str) {
        self.lock().push((priority, message.to_owned()));
    }
}

/// Cloneable [`Write`] target used to capture console output.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer. Clones share the same storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far as lossy UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
