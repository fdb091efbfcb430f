//! crates/daemon-log/src/reentrancy.rs
//!
//! Tracks which threads are inside a log call.
//!
//! The set has its own (sharded) locks and is never touched while the
//! logger's state lock is held, so a log call made from inside a write
//! (a console writer that logs, a `Display` impl that logs) sees itself in
//! the set and bails out instead of blocking on the state lock.

use std::thread::{self, ThreadId};

use dashmap::DashSet;

#[derive(Debug, Default)]
pub(crate) struct ActiveThreads {
    threads: DashSet<ThreadId>,
}

/// Outcome of [`ActiveThreads::enter`].
pub(crate) enum Entry<'a> {
    /// The calling thread was not logging; it is now marked until the guard drops.
    Entered(ActiveGuard<'a>),
    /// The calling thread is already inside a log call.
    Reentered,
}

impl ActiveThreads {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks the calling thread as logging, unless it already is.
    pub(crate) fn enter(&self) -> Entry<'_> {
        let id = thread::current().id();
        if self.threads.insert(id) {
            Entry::Entered(ActiveGuard { set: self, id })
        } else {
            Entry::Reentered
        }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.threads.contains(&thread::current().id())
    }
}

/// Removes the thread from the active set when dropped.
pub(crate) struct ActiveGuard<'a> {
    set: &'a ActiveThreads,
    id: ThreadId,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.set.threads.remove(&self.id);
    }
}
