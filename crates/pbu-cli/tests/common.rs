#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;

/// `pbu` with a clean interpreter configuration and colors off.
pub fn pbu() -> Command {
    let mut cmd = cargo_bin_cmd!("pbu");
    cmd.env_remove("PBU_PYTHON")
        .env_remove("PBU_SITE_MARKER")
        .env("NO_COLOR", "1");
    cmd
}

pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, b"").expect("write file");
    path
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stderr.clone()).expect("utf8 stderr")
}

pub fn find_python() -> Option<String> {
    ["python3", "python"]
        .into_iter()
        .find(|candidate| {
            StdCommand::new(candidate)
                .arg("--version")
                .output()
                .is_ok_and(|output| output.status.success())
        })
        .map(ToOwned::to_owned)
}
