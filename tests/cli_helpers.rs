#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

/// Config path inside the temp home; absent unless a test writes it
pub fn config_path_for_home(home: &TempDir) -> PathBuf {
    home.path().join("carteira.toml")
}

pub fn write_config(home: &TempDir, contents: &str) -> PathBuf {
    let path = config_path_for_home(home);
    std::fs::write(&path, contents).expect("failed to write config");
    path
}

pub fn write_positions(home: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = home.path().join(name);
    std::fs::write(&path, contents).expect("failed to write positions file");
    path
}

pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("carteira"));
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd.env("CARTEIRA_CONFIG", config_path_for_home(home));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let output = run_cmd(home, args)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

pub fn rollup_json(home: &TempDir, file: &Path, extra: &[&str]) -> Result<Value> {
    let file = file.to_string_lossy().to_string();
    let mut args = vec!["--json", "rollup", file.as_str()];
    args.extend_from_slice(extra);
    run_cmd_json(home, &args)
}

/// Node names at one level of a JSON rollup
pub fn names(nodes: &Value) -> Vec<String> {
    nodes
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|n| n["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
