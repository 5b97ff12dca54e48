#![allow(dead_code)]

use assert_cmd::cargo_bin;
use std::path::Path;
use std::process::{Command, Output};

pub fn cli() -> Command {
    let mut cmd = Command::new(cargo_bin!("proposal-builder"));
    cmd.env_remove("PROPOSAL_CATALOG")
        .env_remove("PROPOSAL_DATA_FILE")
        .env_remove("RUST_LOG");
    cmd
}

pub fn run(data_file: &Path, args: &[&str]) -> Output {
    cli()
        .arg("--data-file")
        .arg(data_file)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Saves a proposal and returns its id as printed by the CLI.
pub fn save(data_file: &Path, client_name: &str, selection: &[&str]) -> String {
    let mut args = vec!["save", "--client-name", client_name, "--date", "2026-10-18"];
    args.extend_from_slice(selection);

    let output = run(data_file, &args);
    assert!(
        output.status.success(),
        "save failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .last()
        .expect("save prints the proposal id")
        .to_string()
}
