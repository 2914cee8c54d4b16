#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub fn stencil_cmd() -> Command {
    let mut cmd = Command::cargo_bin("stencil").unwrap();
    cmd.env_remove("STENCIL_CONFIG");
    cmd.env_remove("STENCIL_LOG");
    cmd
}

/// Write `body` to `root/rel`, creating parent directories
pub fn write_file(root: &Path, rel: &str, body: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, body).unwrap();
    path
}
