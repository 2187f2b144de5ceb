//! CLI end-to-end tests
//!
//! Tests for the babelfish command-line interface. None of them reach a real
//! provider.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the babelfish binary with no provider keys in scope
#[allow(deprecated)]
fn babelfish_cmd() -> Command {
    let mut cmd = Command::cargo_bin("babelfish").unwrap();
    cmd.env_remove("SYNC_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ELEVEN_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("babelfish.toml");
    fs::write(
        &path,
        format!("work_dir = {:?}\n", dir.join("work").display().to_string()),
    )
    .unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    babelfish_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_lists_commands() {
    babelfish_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("check-tools"));
}

#[test]
fn test_cli_version_command() {
    babelfish_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "babelfish {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_check_tools_command() {
    babelfish_cmd()
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg"))
        .stdout(predicate::str::contains("ffprobe"));
}

#[test]
fn test_cli_validate_good_config() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    babelfish_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Max wait: unbounded"));
}

#[test]
fn test_cli_validate_bad_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[sync]\nmax_wait_secs = 0\n").unwrap();

    babelfish_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_wait_secs"));
}

#[test]
fn test_cli_translate_requires_video_url() {
    babelfish_cmd()
        .arg("translate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--video-url"));
}

#[test]
fn test_cli_translate_rejects_unknown_sync_mode() {
    babelfish_cmd()
        .args([
            "translate",
            "--video-url",
            "https://cdn.example.com/clip.mp4",
            "--sync-mode",
            "shuffle",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown sync mode"));
}

#[test]
fn test_cli_translate_missing_keys_is_fault() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    babelfish_cmd()
        .arg("-c")
        .arg(&config)
        .args(["translate", "--video-url", "https://cdn.example.com/clip.mp4"])
        .env("OPENAI_API_KEY", "sk-test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sync_api_key"))
        .stderr(predicate::str::contains("eleven_api_key"))
        .stderr(predicate::str::contains("sk-test").not());
}

#[test]
fn test_cli_translate_unreachable_video_is_fault() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    babelfish_cmd()
        .arg("-c")
        .arg(&config)
        .args([
            "translate",
            "--video-url",
            "http://127.0.0.1:9/clip.mp4",
            "--segment-start",
            "-1",
            "--sync-api-key",
            "s",
            "--openai-api-key",
            "o",
            "--eleven-api-key",
            "e",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("transfer failed"));
}
