//! CLI end-to-end tests
//!
//! Tests for the foldwatch command-line interface. Every test points
//! `--config` at a temporary file so the user's configuration is untouched.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the foldwatch binary
#[allow(deprecated)]
fn foldwatch_cmd() -> Command {
    Command::cargo_bin("foldwatch").unwrap()
}

fn with_config(config: &Path) -> Command {
    let mut cmd = foldwatch_cmd();
    cmd.arg("--config").arg(config);
    cmd
}

fn config_in(dir: &Path) -> PathBuf {
    dir.join("cfg").join("folders.toml")
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = foldwatch_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = foldwatch_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("foldwatch"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = foldwatch_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("foldwatch"));
}

#[test]
fn test_cli_daemon_help() {
    let mut cmd = foldwatch_cmd();
    cmd.args(["daemon", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--settle-ms"));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = foldwatch_cmd();
    cmd.arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("notify-send"));
}

#[test]
fn test_cli_list_empty() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    with_config(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No folders are being watched"));
    assert!(config.exists());
}

#[test]
fn test_cli_add_list_remove() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let inbox = dir.path().join("inbox");
    let inbox_str = inbox.to_string_lossy().to_string();

    with_config(&config)
        .args(["add", &inbox_str, "--action", "resize-50", "--ext", "png,.JPG"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resize-50"));
    assert!(inbox.is_dir());

    with_config(&config)
        .args(["add", &inbox_str, "--command", "gzip {}", "--keep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom: gzip {}"));

    with_config(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(inbox_str.as_str()))
        .stdout(predicate::str::contains("resize-50 [png, jpg]"))
        .stdout(predicate::str::contains("custom: gzip {} (keep original)"));

    with_config(&config)
        .args(["remove", &inbox_str, "gzip {}"])
        .assert()
        .success();

    with_config(&config)
        .args(["remove", &inbox_str])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 binding(s)"));

    with_config(&config)
        .args(["remove", &inbox_str])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_add_rejects_unknown_action() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let inbox = dir.path().join("inbox");

    with_config(&config)
        .arg("add")
        .arg(&inbox)
        .args(["--action", "sharpen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown action"));
}

#[test]
fn test_cli_add_requires_action_or_command() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    with_config(&config)
        .arg("add")
        .arg(dir.path().join("inbox"))
        .assert()
        .failure();

    with_config(&config)
        .arg("add")
        .arg(dir.path().join("inbox"))
        .args(["--action", "compress", "--command", "gzip {}"])
        .assert()
        .failure();
}

/// Start the daemon, wait for it to come up, deliver `signal` and return its
/// exit status with everything it logged.
#[cfg(unix)]
fn daemon_stopped_by(signal: &str) -> (std::process::ExitStatus, String) {
    use std::io::{BufRead, BufReader};
    use std::process::Stdio;
    use std::sync::mpsc;
    use std::time::Duration;

    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    let mut child = with_config(&config)
        .args(["daemon", "--settle-ms", "50"])
        .env("RUST_LOG", "foldwatch=info")
        .env("NO_COLOR", "1")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let (tx, rx) = mpsc::channel();
    let stderr = child.stderr.take().unwrap();
    std::thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            let _ = tx.send(line);
        }
    });

    let mut log = Vec::new();
    loop {
        let line = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        let started = line.contains("Watch manager started");
        log.push(line);
        if started {
            break;
        }
    }
    std::thread::sleep(Duration::from_millis(200));

    let sent = Command::new("kill")
        .args([signal, &child.id().to_string()])
        .status()
        .unwrap();
    assert!(sent.success());

    let status = child.wait().unwrap();
    log.extend(rx.iter());
    (status, log.join("\n"))
}

#[cfg(unix)]
#[test]
fn test_cli_daemon_stops_cleanly_on_sigterm() {
    let (status, log) = daemon_stopped_by("-TERM");

    assert!(status.success(), "daemon exited with {status}:\n{log}");
    assert!(log.contains("Shutdown signal received"), "{log}");
    assert!(log.contains("Watch manager stopped"), "{log}");
}

#[cfg(unix)]
#[test]
fn test_cli_daemon_stops_cleanly_on_sigint() {
    let (status, log) = daemon_stopped_by("-INT");

    assert!(status.success(), "daemon exited with {status}:\n{log}");
    assert!(log.contains("Watch manager stopped"), "{log}");
}
