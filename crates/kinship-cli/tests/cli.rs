//! Exit-code tests for the `kinship` binary

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn kinship(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kinship"))
        .args(args)
        .current_dir(cwd)
        .env_remove("KINSHIP_DATA_DIR")
        .env_remove("KINSHIP_OUT_DIR")
        .env_remove("KINSHIP_RENDERER")
        .env_remove("KINSHIP_LOG")
        .output()
        .expect("failed to run kinship")
}

#[test]
fn test_no_arguments_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = kinship(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: kinship"));
}

#[test]
fn test_unsupported_format_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = kinship(dir.path(), &["bmp"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: kinship"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bmp"));
}

#[test]
fn test_unknown_flag_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let output = kinship(dir.path(), &["--fast", "png"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("build aborted:"));
}

#[test]
fn test_pipeline_failure_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    let out = dir.path().join("out");

    let output = kinship(
        dir.path(),
        &[
            &format!("--data={}", data.display()),
            &format!("--out={}", out.display()),
            "--renderer=false",
            "png",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("build aborted:"));
    assert!(stderr.contains("graph.yaml"));
    // nothing is reset when loading fails
    assert!(!out.exists());
}
