//! Command line behaviour of the exe-compare binary

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn exe_compare() -> Command {
    Command::new(env!("CARGO_BIN_EXE_exe-compare"))
}

#[test]
fn test_missing_argument_prints_usage() {
    let output = exe_compare().output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: exe-compare <script.json>"));
}

#[test]
fn test_extra_argument_prints_usage() {
    let output = exe_compare().args(["a.json", "b.json"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage:"));
}

#[test]
fn test_failure_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("1")).unwrap();
    fs::create_dir(root.join("2")).unwrap();
    fs::write(root.join("1/app.exe"), [0u8; 10]).unwrap();
    fs::write(root.join("2/app.exe"), [0, 0, 0, 0, 0, 0xFF, 0, 0, 0, 0]).unwrap();

    let script = root.join("script.json");
    fs::write(
        &script,
        format!(
            r#"{{"dir_1": {:?}, "dir_2": {:?}, "files": [{{"name": "app.exe"}}]}}"#,
            root.join("1").display().to_string(),
            root.join("2").display().to_string()
        ),
    )
    .unwrap();

    let output = exe_compare().arg(&script).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Data block mismatch at 0x5 (5)"), "{}", stderr);
}

#[test]
fn test_success_prints_progress() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("1")).unwrap();
    fs::create_dir(root.join("2")).unwrap();
    fs::write(root.join("1/app.exe"), b"same bytes").unwrap();
    fs::write(root.join("2/app.exe"), b"same bytes").unwrap();

    let script = root.join("script.json");
    fs::write(
        &script,
        format!(
            r#"{{"dir_1": {:?}, "dir_2": {:?}, "files": [{{"name": "app.exe"}}]}}"#,
            root.join("1").display().to_string(),
            root.join("2").display().to_string()
        ),
    )
    .unwrap();

    let output = exe_compare().arg(&script).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File: \"app.exe\""), "{}", stdout);
    assert!(stdout.ends_with("Succeeded.\n"), "{}", stdout);
}
