// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hooksctl bug-report`

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::client::{self, ProjectPaths};

#[derive(clap::Args)]
pub struct BugReportArgs {
    /// What went wrong, in the reporter's own words.
    pub description: String,

    /// Where to write the diagnostic bundle. "-" (default) means stdout.
    #[arg(long, default_value = "-")]
    pub output: String,
}

#[derive(Debug, Serialize)]
struct BugReport {
    description: String,
    cli_version: String,
    project_root: String,
    socket_path: String,
    pid_path: String,
    config_path: String,
    daemon_pid: Option<u32>,
    daemon_version: Option<String>,
    config_exists: bool,
    recent_log_lines: Vec<String>,
}

const TAIL_LINES: usize = 100;

pub fn run(project_root: &Path, args: BugReportArgs) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;

    let recent_log_lines = std::fs::read_to_string(&paths.log_path)
        .map(|content| {
            let lines: Vec<String> = content.lines().map(str::to_string).collect();
            let start = lines.len().saturating_sub(TAIL_LINES);
            lines[start..].to_vec()
        })
        .unwrap_or_default();

    let report = BugReport {
        description: args.description,
        cli_version: env!("CARGO_PKG_VERSION").to_string(),
        project_root: paths.project_root.display().to_string(),
        socket_path: paths.socket_path.display().to_string(),
        pid_path: paths.pid_path.display().to_string(),
        config_path: paths.config_path.display().to_string(),
        daemon_pid: client::is_running(&paths),
        daemon_version: std::fs::read_to_string(&paths.version_path).ok().map(|s| s.trim().to_string()),
        config_exists: paths.config_path.exists(),
        recent_log_lines,
    };

    let json = serde_json::to_string_pretty(&report)?;
    if args.output == "-" {
        println!("{}", json);
    } else {
        std::fs::write(&args.output, json)?;
        println!("wrote bug report to {}", args.output);
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(dir: &tempfile::TempDir) -> std::path::PathBuf {
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        dir.path().to_path_buf()
    }

    #[test]
    fn writes_a_bundle_to_stdout_with_no_daemon_running() {
        let dir = tempfile::tempdir().unwrap();
        let root = project(&dir);
        let code = run(&root, BugReportArgs { description: "crashes on start".into(), output: "-".into() }).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn writes_a_bundle_to_a_file_when_given_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = project(&dir);
        let out_path = dir.path().join("bundle.json");

        let code = run(
            &root,
            BugReportArgs { description: "issue".into(), output: out_path.display().to_string() },
        )
        .unwrap();
        assert_eq!(code, 0);

        let written = std::fs::read_to_string(&out_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["description"], "issue");
        assert_eq!(parsed["config_exists"], false);
    }
}
