#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated `SPENDWISE_HOME` for one test.
pub fn test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// The shell in script mode, reading commands from stdin.
pub fn script_command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spendwise_cli").expect("binary builds");
    cmd.env("SPENDWISE_CLI_SCRIPT", "1")
        .env("SPENDWISE_HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

pub fn store_path(home: &Path, profile: &str) -> PathBuf {
    home.join("stores").join(format!("{profile}.json"))
}

/// Reads a profile store as its raw key/value map.
pub fn read_store(home: &Path, profile: &str) -> Map<String, Value> {
    let data = fs::read_to_string(store_path(home, profile)).expect("read store file");
    serde_json::from_str(&data).expect("store is a JSON object")
}

pub fn store_string(home: &Path, key: &str) -> String {
    read_store(home, "default")
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
