//! End-to-end checks of the `tilegrab` binary that need no network.

use std::process::Command;

use tempfile::TempDir;

fn tilegrab(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tilegrab"));
    cmd.env("HOME", home.path());
    cmd
}

#[test]
fn test_init_creates_config_file() {
    let home = TempDir::new().unwrap();

    let output = tilegrab(&home).arg("init").output().unwrap();

    assert!(output.status.success());
    let config = home.path().join(".tilegrab").join("config.ini");
    assert!(config.exists());
    let content = std::fs::read_to_string(config).unwrap();
    assert!(content.contains("[download]"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Created configuration"));
}

#[test]
fn test_init_keeps_existing_config() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".tilegrab");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.ini"), "[download]\nstrategy = fast\n").unwrap();

    let output = tilegrab(&home).arg("init").output().unwrap();

    assert!(output.status.success());
    let content = std::fs::read_to_string(dir.join("config.ini")).unwrap();
    assert_eq!(content, "[download]\nstrategy = fast\n");
    assert!(String::from_utf8_lossy(&output.stdout).contains("already exists"));
}

#[test]
fn test_unknown_strategy_is_rejected() {
    let home = TempDir::new().unwrap();

    let output = tilegrab(&home)
        .args(["download", "http://archive.test/b1", "--strategy", "bogus"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bogus"));
}

#[test]
fn test_zero_attempts_is_rejected() {
    let home = TempDir::new().unwrap();

    let output = tilegrab(&home)
        .args(["download", "http://archive.test/b1", "--attempts", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();

    let output = tilegrab(&home).arg("--version").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let home = TempDir::new().unwrap();

    let output = tilegrab(&home)
        .args(["download", "http://archive.test/b1", "--timeout", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--timeout"));
}
