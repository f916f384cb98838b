// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hooksctl logs`

use std::path::Path;

use anyhow::Result;

use crate::client::ProjectPaths;

#[derive(clap::Args)]
pub struct LogsArgs {
    /// Number of trailing lines to print.
    #[arg(long, default_value_t = 50)]
    pub tail: usize,
}

pub fn run(project_root: &Path, args: LogsArgs) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;

    let Ok(content) = std::fs::read_to_string(&paths.log_path) else {
        println!("no log file yet at {}", paths.log_path.display());
        return Ok(0);
    };

    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(args.tail);
    for line in &lines[start..] {
        println!("{}", line);
    }

    Ok(0)
}
