//! Integration tests for destination switching, the log file and rotation.

use std::fs;
use std::path::{Path, PathBuf};

use daemon_log::{Category, Destinations, Logger, LoggerError, Severity};
use daemon_log_sink::test_support::{MemorySyslog, SharedBuffer};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
    logger: Logger,
    syslog: MemorySyslog,
    console: SharedBuffer,
}

fn file_logger(destinations: Destinations) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("daemon.log");
    let syslog = MemorySyslog::new();
    let console = SharedBuffer::new();
    let logger = Logger::builder()
        .threshold(5)
        .destinations(destinations)
        .log_file(&path)
        .syslog(syslog.clone())
        .console(console.clone())
        .build()
        .expect("build logger");
    Fixture {
        _dir: dir,
        path,
        logger,
        syslog,
        console,
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read log file")
}

/// Message parts of each `<timestamp> (<thread>): <message>` line.
fn messages(path: &Path) -> Vec<String> {
    read(path)
        .lines()
        .map(|line| {
            let (_, message) = line.split_once("): ").expect("entry has a thread id");
            message.to_owned()
        })
        .collect()
}

fn assert_entry_shape(line: &str) {
    let bytes = line.as_bytes();
    assert!(line.len() > 32, "entry too short: {line:?}");
    for (index, byte) in bytes[..19].iter().enumerate() {
        match index {
            4 | 7 => assert_eq!(*byte, b'-', "{line:?}"),
            10 => assert_eq!(*byte, b' ', "{line:?}"),
            13 | 16 => assert_eq!(*byte, b':', "{line:?}"),
            _ => assert!(byte.is_ascii_digit(), "{line:?}"),
        }
    }
    assert_eq!(&line[19..21], " (", "{line:?}");
    assert!(
        line[21..29]
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)),
        "{line:?}"
    );
    assert_eq!(&line[29..32], "): ", "{line:?}");
}

// ============================================================================
// File Entry Tests
// ============================================================================

/// Verifies the storage-only file scenario writes one well-formed entry.
#[test]
fn file_entry_has_timestamp_and_thread_id() {
    let fixture = file_logger(Destinations::FILE);
    fixture
        .logger
        .set_category_filter("storage")
        .expect("known category");

    fixture.logger.log(Severity::Info, Category::Storage, "hello");
    fixture.logger.log(Severity::Info, Category::Network, "dropped");

    let contents = read(&fixture.path);
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "{contents:?}");
    assert!(lines[0].ends_with("): Category mask is 0x80000004"));
    assert_entry_shape(lines[1]);
    assert!(lines[1].ends_with("): hello"));
    assert!(fixture.console.contents().is_empty());
}

/// Verifies an existing file is appended to by default.
#[test]
fn log_file_appends_by_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("daemon.log");
    fs::write(&path, "earlier run\n").expect("seed log file");

    let logger = Logger::builder()
        .destinations(Destinations::FILE)
        .log_file(&path)
        .syslog(MemorySyslog::new())
        .console(SharedBuffer::new())
        .build()
        .expect("build logger");
    logger.log(Severity::Warn, Category::Main, "this run");

    let contents = read(&path);
    assert!(contents.starts_with("earlier run\n"));
    assert!(contents.ends_with("): this run\n"));
}

/// Verifies truncate mode empties an existing file on open.
#[test]
fn truncate_mode_empties_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("daemon.log");
    fs::write(&path, "earlier run\n").expect("seed log file");

    let logger = Logger::builder()
        .destinations(Destinations::FILE)
        .log_file(&path)
        .truncate(true)
        .syslog(MemorySyslog::new())
        .console(SharedBuffer::new())
        .build()
        .expect("build logger");
    assert!(logger.truncate_on_open());
    logger.log(Severity::Warn, Category::Main, "fresh");

    assert_eq!(messages(&path), vec!["fresh".to_owned()]);
}

/// Verifies toggling truncation reopens the open file.
#[test]
fn set_truncate_on_open_reopens_file() {
    let fixture = file_logger(Destinations::FILE);
    fixture.logger.log(Severity::Warn, Category::Main, "old");
    let generation = fixture.logger.log_file_generation();

    fixture
        .logger
        .set_truncate_on_open(true)
        .expect("reopen with truncation");
    assert_ne!(fixture.logger.log_file_generation(), generation);
    assert!(read(&fixture.path).is_empty());

    let generation = fixture.logger.log_file_generation();
    fixture
        .logger
        .set_truncate_on_open(true)
        .expect("unchanged flag");
    assert_eq!(fixture.logger.log_file_generation(), generation);

    fixture.logger.log(Severity::Warn, Category::Main, "new");
    assert_eq!(messages(&fixture.path), vec!["new".to_owned()]);
}

/// Verifies turning truncation off reopens the file for appending.
#[test]
fn clearing_truncate_reopens_in_append_mode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("daemon.log");
    fs::write(&path, "earlier run\n").expect("seed log file");
    let logger = Logger::builder()
        .destinations(Destinations::FILE)
        .log_file(&path)
        .truncate(true)
        .syslog(MemorySyslog::new())
        .console(SharedBuffer::new())
        .build()
        .expect("build logger");
    logger.log(Severity::Warn, Category::Main, "kept");
    let generation = logger.log_file_generation();

    logger
        .set_truncate_on_open(false)
        .expect("reopen for appending");
    assert!(!logger.truncate_on_open());
    assert_ne!(logger.log_file_generation(), generation);

    logger.log(Severity::Warn, Category::Main, "appended");
    assert_eq!(
        messages(&path),
        vec!["kept".to_owned(), "appended".to_owned()]
    );
}

/// Verifies the flag only records the mode when no file is open, and the
/// next file opened uses it.
#[test]
fn truncate_flag_without_open_file_applies_to_next_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("daemon.log");
    fs::write(&path, "earlier run\n").expect("seed log file");
    let logger = Logger::builder()
        .destinations(Destinations::CONSOLE)
        .syslog(MemorySyslog::new())
        .console(SharedBuffer::new())
        .build()
        .expect("build logger");

    logger
        .set_truncate_on_open(true)
        .expect("no file to reopen");
    assert!(logger.truncate_on_open());
    assert_eq!(logger.log_file_generation(), None);
    assert_eq!(logger.destinations(), Destinations::CONSOLE);
    assert_eq!(read(&path), "earlier run\n");

    logger.set_log_file(&path).expect("open log file");
    assert!(read(&path).is_empty());

    logger.log(Severity::Warn, Category::Main, "fresh");
    assert_eq!(messages(&path), vec!["fresh".to_owned()]);
}

/// Verifies switching files closes the old one.
#[test]
fn set_log_file_switches_files() {
    let fixture = file_logger(Destinations::FILE);
    let other = fixture.path.with_file_name("other.log");

    fixture.logger.log(Severity::Warn, Category::Main, "first");
    fixture.logger.set_log_file(&other).expect("open other file");
    fixture.logger.log(Severity::Warn, Category::Main, "second");

    assert_eq!(fixture.logger.log_file_path(), Some(other.clone()));
    assert_eq!(messages(&fixture.path), vec!["first".to_owned()]);
    assert_eq!(messages(&other), vec!["second".to_owned()]);
}

/// Verifies a successful open turns the file destination on.
#[test]
fn set_log_file_activates_file_destination() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("late.log");
    let logger = Logger::builder()
        .destinations(Destinations::CONSOLE)
        .syslog(MemorySyslog::new())
        .console(SharedBuffer::new())
        .build()
        .expect("build logger");
    assert_eq!(logger.log_file_generation(), None);

    logger.set_log_file(&path).expect("open log file");
    assert_eq!(
        logger.destinations(),
        Destinations::CONSOLE | Destinations::FILE
    );
    logger.log(Severity::Warn, Category::Main, "late");
    assert_eq!(messages(&path), vec!["late".to_owned()]);
}

// ============================================================================
// Destination Switching Tests
// ============================================================================

/// Verifies setting the current destinations again keeps the same handle.
#[test]
fn identical_destinations_are_a_no_op() {
    let fixture = file_logger(Destinations::FILE);
    let generation = fixture.logger.log_file_generation();
    assert!(generation.is_some());

    fixture.logger.set_destinations(Destinations::FILE);
    assert_eq!(fixture.logger.log_file_generation(), generation);

    fixture.logger.log(Severity::Warn, Category::Main, "still here");
    assert_eq!(messages(&fixture.path), vec!["still here".to_owned()]);
}

/// Verifies dropping the file destination closes the file and later writes
/// go nowhere until a file is set again.
#[test]
fn removing_file_destination_closes_file() {
    let fixture = file_logger(Destinations::FILE | Destinations::CONSOLE);
    fixture.logger.log(Severity::Warn, Category::Main, "before");

    fixture.logger.set_destinations(Destinations::CONSOLE);
    assert_eq!(fixture.logger.log_file_generation(), None);
    fixture.logger.log(Severity::Warn, Category::Main, "console only");

    fixture
        .logger
        .set_destinations(Destinations::CONSOLE | Destinations::FILE);
    fixture.logger.log(Severity::Warn, Category::Main, "no handle");

    assert_eq!(messages(&fixture.path), vec!["before".to_owned()]);
    assert_eq!(
        fixture.console.contents(),
        "before\nconsole only\nno handle\n"
    );
}

/// Verifies an empty destination set silences filtered output.
#[test]
fn no_destinations_discards_filtered_messages() {
    let fixture = file_logger(Destinations::FILE);
    fixture.logger.set_destinations(Destinations::NONE);
    fixture.logger.log(Severity::Warn, Category::Main, "gone");

    assert!(fixture.console.contents().is_empty());
    assert!(fixture.syslog.entries().is_empty());
}

// ============================================================================
// Rotation Tests
// ============================================================================

/// Verifies reopening without the file destination does nothing.
#[test]
fn reopen_without_file_destination_is_a_no_op() {
    let syslog = MemorySyslog::new();
    let console = SharedBuffer::new();
    let logger = Logger::builder()
        .destinations(Destinations::CONSOLE)
        .syslog(syslog.clone())
        .console(console.clone())
        .build()
        .expect("build logger");

    logger.reopen_log_file().expect("nothing to reopen");
    assert!(console.contents().is_empty());
    assert!(syslog.entries().is_empty());
}

/// Verifies reopening keeps appending to the same path and logs the rotation.
#[test]
fn reopen_appends_to_same_path() {
    let fixture = file_logger(Destinations::FILE);
    fixture.logger.log(Severity::Warn, Category::Main, "a");
    let generation = fixture.logger.log_file_generation();

    fixture.logger.reopen_log_file().expect("reopen");
    fixture.logger.log(Severity::Warn, Category::Main, "b");

    assert_ne!(fixture.logger.log_file_generation(), generation);
    assert_eq!(
        messages(&fixture.path),
        vec!["a".to_owned(), "Rotated logs".to_owned(), "b".to_owned()]
    );
    assert_eq!(fixture.syslog.messages(), vec!["Rotated logs".to_owned()]);
}

/// Verifies a renamed file is replaced by a new one at the configured path.
#[test]
fn reopen_after_rename_starts_new_file() {
    let fixture = file_logger(Destinations::FILE);
    let rotated = fixture.path.with_extension("log.1");
    fixture.logger.log(Severity::Warn, Category::Main, "old");

    fs::rename(&fixture.path, &rotated).expect("rotate");
    fixture.logger.reopen_log_file().expect("reopen");
    fixture.logger.log(Severity::Warn, Category::Main, "new");

    assert_eq!(messages(&rotated), vec!["old".to_owned()]);
    assert_eq!(
        messages(&fixture.path),
        vec!["Rotated logs".to_owned(), "new".to_owned()]
    );
}

/// Verifies a failed reopen falls back to the system log.
#[test]
fn failed_reopen_falls_back_to_syslog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logs = dir.path().join("logs");
    fs::create_dir(&logs).expect("create log dir");
    let path = logs.join("daemon.log");
    let syslog = MemorySyslog::new();
    let logger = Logger::builder()
        .threshold(5)
        .destinations(Destinations::FILE)
        .log_file(&path)
        .syslog(syslog.clone())
        .console(SharedBuffer::new())
        .build()
        .expect("build logger");

    fs::remove_dir_all(&logs).expect("remove log dir");
    let error = logger.reopen_log_file().expect_err("directory is gone");

    assert!(matches!(error, LoggerError::OpenLogFile { ref path, .. } if *path == logs.join("daemon.log")));
    assert_eq!(logger.destinations(), Destinations::SYSLOG);
    assert_eq!(logger.log_file_generation(), None);
    let messages = syslog.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Could not rotate log file: "));

    logger.log(Severity::Warn, Category::Main, "via syslog");
    assert_eq!(syslog.messages().last().map(String::as_str), Some("via syslog"));
}
