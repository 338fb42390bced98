use loggen_core::record::LogRecord;
use std::fs;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

// =============================================================================
// Helper Functions
// =============================================================================

fn loggen(host: &str, file: &Path, speed: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_loggen"));
    cmd.env_clear()
        .env("HOST", host)
        .env("LOG_FILE", file)
        .env("LOG_SPEED", speed)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).map(|s| s.lines().count()).unwrap_or(0)
}

/// Poll until `path` holds at least `lines` lines or the deadline passes.
fn wait_for_lines(path: &Path, lines: usize, deadline: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if line_count(path) >= lines {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

fn terminate(child: Child) -> Output {
    unsafe {
        libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
    }
    child.wait_with_output().unwrap()
}

// =============================================================================
// Fatal Startup Tests
// =============================================================================

#[test]
fn test_non_numeric_speed_exits_without_touching_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");

    let output = loggen("test-host", &path, "abc").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LOG_SPEED"), "{stderr}");
    assert!(!path.exists());
}

#[test]
fn test_missing_host_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");

    let output = Command::new(env!("CARGO_BIN_EXE_loggen"))
        .env_clear()
        .env("LOG_FILE", &path)
        .env("LOG_SPEED", "5")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("HOST"));
    assert!(!path.exists());
}

#[test]
fn test_unwritable_path_is_fatal_mid_loop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("access.log");

    let output = loggen("test-host", &path, "50").output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing-dir"));
}

#[test]
fn test_unrepresentable_interval_is_fatal_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");

    let output = loggen("test-host", &path, "1e-19").output().unwrap();

    // anyhow error from main, not a panic (101)
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too long"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
    assert!(!path.exists());
}

// =============================================================================
// Emission Tests
// =============================================================================

#[test]
fn test_appends_json_lines_and_exits_cleanly_on_sigterm() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");
    fs::write(&path, "{\"prior\":\"content\"}\n").unwrap();

    let child = loggen("test-host", &path, "20").spawn().unwrap();
    let ready = wait_for_lines(&path, 4, Duration::from_secs(10));
    let output = terminate(child);

    assert!(ready, "no records appeared");
    assert!(output.status.success(), "exit: {:?}", output.status);
    assert!(output.stdout.is_empty(), "diagnostics belong on stderr");

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.ends_with('\n'));
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("{\"prior\":\"content\"}"));
    for line in lines {
        let record: LogRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.host, "test-host");
        assert!(record.is_complete());
    }
}

#[test]
fn test_restart_continues_appending() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");

    let child = loggen("first", &path, "20").spawn().unwrap();
    assert!(wait_for_lines(&path, 2, Duration::from_secs(10)));
    terminate(child);
    let before = fs::read_to_string(&path).unwrap();

    let child = loggen("second", &path, "20").spawn().unwrap();
    assert!(wait_for_lines(&path, before.lines().count() + 2, Duration::from_secs(10)));
    terminate(child);
    let after = fs::read_to_string(&path).unwrap();

    assert!(after.starts_with(&before));
    let hosts: Vec<String> = after
        .lines()
        .map(|l| serde_json::from_str::<LogRecord>(l).unwrap().host)
        .collect();
    assert_eq!(hosts.first().map(String::as_str), Some("first"));
    assert_eq!(hosts.last().map(String::as_str), Some("second"));
}
