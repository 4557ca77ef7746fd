//! CLI binary integration tests.
//!
//! These tests exercise the compiled `solidnotify` binary to verify that
//! command routing, help text, config handling and error exits work.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Locate the compiled `solidnotify` binary in the workspace target directory.
///
/// Returns `None` when the binary has not been built, e.g. when only this
/// package is being tested.
fn solidnotify_bin() -> Option<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir.parent()?.parent()?.to_path_buf();
    let target = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace_root.join("target"));
    let bin = target
        .join("debug")
        .join(format!("solidnotify{}", std::env::consts::EXE_SUFFIX));
    if bin.exists() {
        Some(bin)
    } else {
        eprintln!(
            "solidnotify binary not found at {}; run `cargo build -p solidnotify-cli` first",
            bin.display()
        );
        None
    }
}

macro_rules! solidnotify_cmd {
    () => {
        match solidnotify_bin() {
            Some(bin) => {
                let mut cmd = Command::new(bin);
                cmd.env_remove("SOLIDNOTIFY_CONFIG").env_remove("RUST_LOG");
                cmd
            }
            None => return,
        }
    };
}

#[test]
fn test_cli_version() {
    let output = solidnotify_cmd!()
        .arg("version")
        .output()
        .expect("failed to run solidnotify");
    assert!(output.status.success(), "version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("solidnotify"),
        "version output should contain 'solidnotify', got: {}",
        stdout
    );
}

#[test]
fn test_cli_help() {
    let output = solidnotify_cmd!()
        .arg("--help")
        .output()
        .expect("failed to run solidnotify");
    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["discover", "negotiate", "subscribe", "config"] {
        assert!(
            stdout.contains(command),
            "help output should mention '{}', got: {}",
            command,
            stdout
        );
    }
}

#[test]
fn test_cli_unknown_command() {
    let output = solidnotify_cmd!()
        .arg("nonexistent-command")
        .output()
        .expect("failed to run solidnotify");
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_cli_subscribe_help() {
    let output = solidnotify_cmd!()
        .args(["subscribe", "--help"])
        .output()
        .expect("failed to run solidnotify subscribe --help");
    assert!(output.status.success(), "subscribe --help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("--endpoint") && stdout.contains("--subprotocol"),
        "subscribe help should list connection flags, got: {}",
        stdout
    );
}

#[test]
fn test_cli_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let output = solidnotify_cmd!()
        .args(["config", "init", "--config"])
        .arg(&path)
        .output()
        .expect("failed to run solidnotify config init");
    assert!(output.status.success(), "config init should succeed");
    assert!(path.exists());

    let output = solidnotify_cmd!()
        .args(["config", "init", "--config"])
        .arg(&path)
        .output()
        .expect("failed to run solidnotify config init");
    assert!(
        !output.status.success(),
        "config init should refuse to overwrite without --force"
    );

    let output = solidnotify_cmd!()
        .args(["config", "show", "--config"])
        .arg(&path)
        .output()
        .expect("failed to run solidnotify config show");
    assert!(output.status.success(), "config show should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("SOLIDNOTIFY_TOKEN"),
        "config show should print the auth section, got: {}",
        stdout
    );
}

#[test]
fn test_cli_discover_requires_valid_topic() {
    let output = solidnotify_cmd!()
        .args(["discover", "not a url"])
        .output()
        .expect("failed to run solidnotify discover");
    assert!(!output.status.success(), "invalid topic should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid topic URL"),
        "stderr should explain the failure, got: {}",
        stderr
    );
}

#[test]
fn test_cli_parses_shared_flags_in_any_position() {
    use clap::Parser;
    use solidnotify_cli::{Cli, Commands};

    let cli = Cli::try_parse_from([
        "solidnotify",
        "negotiate",
        "https://pod.example/resource",
        "-v",
        "--config",
        "/tmp/solidnotify.json5",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 1);
    assert!(cli.config.is_some());
    assert!(matches!(cli.command, Commands::Negotiate(_)));
}
