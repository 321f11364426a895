//! `ism` binary smoke tests.
//!
//! Only checks what holds on every platform; switching is covered against
//! the scripted provider in `boundary.rs`.

use std::process::Command;
use std::str;

fn ism() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ism"))
}

#[test]
fn test_version() {
    let output = ism().arg("--version").output().expect("Failed to execute ism");
    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(stdout.contains("ism"));
}

#[test]
fn test_cycle_conflicts_with_id() {
    let output = ism()
        .args(["com.apple.keylayout.US", "--cycle", "com.apple.keylayout.ABC"])
        .output()
        .expect("Failed to execute ism");
    assert!(!output.status.success());
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_unsupported_platform_reports_error() {
    let output = ism().output().expect("Failed to execute ism");
    assert_eq!(output.status.code(), Some(1));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
}

#[cfg(target_os = "macos")]
#[test]
fn test_current_id_printed() {
    let output = ism().output().expect("Failed to execute ism");
    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap().trim();
    assert!(!stdout.is_empty(), "stdout should not be empty");
}

#[test]
fn test_settle_ms_accepted() {
    let output = ism()
        .args(["--settle-ms", "5"])
        .output()
        .expect("Failed to execute ism");
    assert_ne!(output.status.code(), Some(2), "usage error: {:?}", output);
    if cfg!(target_os = "macos") {
        assert!(output.status.success());
    } else {
        assert_eq!(output.status.code(), Some(1));
    }

    let output = ism()
        .args(["--settle-ms", "soon"])
        .output()
        .expect("Failed to execute ism");
    assert_eq!(output.status.code(), Some(2));
}
