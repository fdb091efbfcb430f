//! crates/daemon-log-sink/src/thread_id.rs
//! Numeric thread identifiers for log file lines.

/// Returns a 32-bit identifier for the calling thread.
///
/// On Unix this is derived from `pthread_self()`; wider handles are folded
/// into 32 bits. The value is only used to tag log lines (`%08x`) and is not
/// guaranteed to be unique across the process lifetime.
#[cfg(unix)]
#[allow(unsafe_code)]
pub fn current_thread_id() -> u32 {
    // SAFETY: pthread_self has no preconditions and always succeeds.
    let raw = unsafe { libc::pthread_self() } as u64;
    fold(raw)
}

/// Returns a 32-bit identifier for the calling thread.
#[cfg(not(unix))]
pub fn current_thread_id() -> u32 {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    fold(hasher.finish())
}

const fn fold(raw: u64) -> u32 {
    (raw ^ (raw >> 32)) as u32
}
