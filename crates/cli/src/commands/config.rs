// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hooksctl validate-config` / `hooksctl init-config`

use std::path::{Path, PathBuf};

use anyhow::Result;
use hooks_core::config::{self, RawConfig};

use crate::client::ProjectPaths;
use crate::error::CliError;

#[derive(clap::Args)]
pub struct ValidateConfigArgs {
    /// Config file to validate. Defaults to the project's own config.
    pub path: Option<PathBuf>,
}

pub fn validate(project_root: &Path, args: ValidateConfigArgs) -> Result<i32> {
    let path = match args.path {
        Some(p) => p,
        None => ProjectPaths::resolve(project_root)?.config_path,
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: could not read {}: {}", path.display(), e);
            return Ok(2);
        }
    };

    let raw: RawConfig = match toml::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: could not parse {} as TOML: {}", path.display(), e);
            return Ok(2);
        }
    };

    let errors = config::validate(&raw);
    if errors.is_empty() {
        println!("{}: valid", path.display());
        Ok(0)
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        eprintln!("{}", CliError::config_invalid(&messages));
        Ok(2)
    }
}

#[derive(clap::Args)]
pub struct InitConfigArgs {
    /// Write the minimal template (default).
    #[arg(long, conflicts_with = "full")]
    pub minimal: bool,
    /// Write the fully-commented template.
    #[arg(long)]
    pub full: bool,
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

pub fn init(project_root: &Path, args: InitConfigArgs) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;

    if paths.config_path.exists() && !args.force {
        eprintln!("{}", CliError::config_exists(&paths.config_path));
        return Ok(1);
    }

    if let Some(parent) = paths.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // `--minimal` is the default already; accepted explicitly for parity
    // with `--full` rather than left unrecognized.
    let minimal = match (args.minimal, args.full) {
        (_, true) => false,
        (_, false) => true,
    };
    std::fs::write(&paths.config_path, config::default_document(minimal))?;
    println!("wrote {}", paths.config_path.display());
    Ok(0)
}
