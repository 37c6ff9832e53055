//! Common test utilities

#![allow(dead_code)]

use rdoit::ui::{Console, SharedBuffer};
use rdoit::Runner;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Console writing into two inspectable buffers
pub fn test_console() -> (Console, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::new();
    let err = SharedBuffer::new();
    (Console::new(out.clone(), err.clone()), out, err)
}

/// Runner on a signature file inside `dir`, printing into buffers
pub fn test_runner(dir: &Path, verbosity: u8) -> (Runner, SharedBuffer, SharedBuffer) {
    let (console, out, err) = test_console();
    let runner = Runner::new(dep_file(dir), verbosity)
        .unwrap()
        .with_console(console);
    (runner, out, err)
}

/// Signature file location used by the tests
pub fn dep_file(dir: &Path) -> PathBuf {
    dir.join("testdb.json")
}

/// Write `contents` to `name` inside `dir`, returning the full path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Create a temporary directory with a dodo.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dodo.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}
