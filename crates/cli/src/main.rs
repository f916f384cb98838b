// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! hooksctl: lifecycle and config tooling for a project's hook-dispatch
//! daemon. Talks to the daemon's PID file, socket file, and log -- never
//! the wire protocol itself, which is the forwarder's job.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::find_project_root;
use crate::commands::{bug_report, config, logs, playbook, start, status, stop};

#[derive(Parser)]
#[command(name = "hooksctl", version, about = "Control the per-project hook-dispatch daemon")]
struct Cli {
    /// Project root. Defaults to `$CLAUDE_HOOKS_PROJECT_ROOT` or the
    /// nearest ancestor directory containing `.claude`.
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon.
    Start(start::StartArgs),
    /// Signal the daemon to shut down gracefully.
    Stop,
    /// Print whether the daemon is running, and its PID.
    Status,
    /// Stop (if running) then start.
    Restart(start::StartArgs),
    /// Print recent daemon log lines.
    Logs(logs::LogsArgs),
    /// Validate a config file without starting the daemon.
    ValidateConfig(config::ValidateConfigArgs),
    /// Emit a listing of the currently configured, enabled handlers.
    GeneratePlaybook(playbook::GeneratePlaybookArgs),
    /// Write a default config file.
    InitConfig(config::InitConfigArgs),
    /// Emit a diagnostic bundle for filing an issue.
    BugReport(bug_report::BugReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_root = cli.project.map_or_else(find_project_root, Ok)?;

    let exit_code = match cli.command {
        Commands::Start(args) => start::run(&project_root, args).await?,
        Commands::Stop => stop::run(&project_root).await?,
        Commands::Status => status::run(&project_root)?,
        Commands::Restart(args) => start::restart(&project_root, args).await?,
        Commands::Logs(args) => logs::run(&project_root, args)?,
        Commands::ValidateConfig(args) => config::validate(&project_root, args)?,
        Commands::GeneratePlaybook(args) => playbook::run(&project_root, args)?,
        Commands::InitConfig(args) => config::init(&project_root, args)?,
        Commands::BugReport(args) => bug_report::run(&project_root, args)?,
    };

    std::process::exit(exit_code);
}
