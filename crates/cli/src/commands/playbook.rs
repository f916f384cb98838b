// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hooksctl generate-playbook`
//!
//! Emits a listing of the handlers currently configured and enabled for
//! this project -- an ephemeral acceptance checklist, not a persisted
//! artifact. Reads straight from config rather than the daemon's live
//! handler registry, since a real project's config can name domain
//! handlers (git safety, linting, ...) this binary never links in.

use std::path::Path;

use anyhow::Result;
use hooks_core::config::RawConfig;
use serde::Serialize;

use crate::client::ProjectPaths;
use crate::output::PlaybookFormat;

#[derive(clap::Args)]
pub struct GeneratePlaybookArgs {
    #[arg(long, value_enum, default_value = "md")]
    pub format: PlaybookFormat,
}

#[derive(Debug, Serialize)]
struct PlaybookEntry {
    name: String,
    event_type: String,
    priority: i64,
    terminal: bool,
    tags: Vec<String>,
}

pub fn run(project_root: &Path, args: GeneratePlaybookArgs) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;

    let raw: RawConfig = match std::fs::read_to_string(&paths.config_path) {
        Ok(text) => toml::from_str(&text)?,
        Err(_) => RawConfig { schema_version: 1, daemon: Default::default(), validation: Default::default(), handlers: Default::default() },
    };

    let mut entries: Vec<PlaybookEntry> = raw
        .handlers
        .iter()
        .filter(|(_, cfg)| cfg.enabled)
        .map(|(name, cfg)| PlaybookEntry {
            name: name.clone(),
            event_type: cfg.event_type.clone(),
            priority: cfg.priority,
            terminal: cfg.terminal,
            tags: cfg
                .extra
                .get("tags")
                .and_then(|v| v.as_array())
                .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
                .unwrap_or_default(),
        })
        .collect();
    entries.sort_by(|a, b| a.event_type.cmp(&b.event_type).then(a.priority.cmp(&b.priority)));

    match args.format {
        PlaybookFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        PlaybookFormat::Yaml => println!("{}", serde_yaml::to_string(&entries)?),
        PlaybookFormat::Md => print_markdown(&entries),
    }

    Ok(0)
}

fn print_markdown(entries: &[PlaybookEntry]) {
    println!("# Acceptance playbook\n");
    if entries.is_empty() {
        println!("No enabled handlers configured.");
        return;
    }
    println!("| Handler | Event | Priority | Terminal | Tags |");
    println!("|---|---|---|---|---|");
    for e in entries {
        let tags = if e.tags.is_empty() { "-".to_string() } else { e.tags.join(", ") };
        println!("| {} | {} | {} | {} | {} |", e.name, e.event_type, e.priority, e.terminal, tags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(dir: &tempfile::TempDir) -> std::path::PathBuf {
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        dir.path().to_path_buf()
    }

    #[test]
    fn returns_0_with_no_config_present() {
        let dir = tempfile::tempdir().unwrap();
        let root = project(&dir);
        assert_eq!(run(&root, GeneratePlaybookArgs { format: PlaybookFormat::Md }).unwrap(), 0);
    }

    #[test]
    fn filters_out_disabled_handlers_and_reads_tags() {
        let dir = tempfile::tempdir().unwrap();
        let root = project(&dir);
        let paths = ProjectPaths::resolve(&root).unwrap();
        std::fs::write(
            &paths.config_path,
            r#"
schema_version = 1
[handlers.noisy]
event_type = "PreToolUse"
priority = 10
enabled = false

[handlers.guard]
event_type = "PreToolUse"
priority = 5
tags = ["safety"]
"#,
        )
        .unwrap();

        for format in [PlaybookFormat::Md, PlaybookFormat::Json, PlaybookFormat::Yaml] {
            assert_eq!(run(&root, GeneratePlaybookArgs { format }).unwrap(), 0);
        }
    }
}
