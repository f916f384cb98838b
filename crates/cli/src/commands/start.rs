// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hooksctl start` / `hooksctl restart`

use std::path::Path;

use anyhow::Result;

use crate::client::{self, ClientError, ProjectPaths};
use crate::error::CliError;

#[derive(clap::Args)]
pub struct StartArgs {
    /// Run the daemon in the foreground instead of spawning it detached.
    #[arg(long)]
    pub foreground: bool,
}

pub async fn run(project_root: &Path, args: StartArgs) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;

    if let Some(pid) = client::is_running(&paths) {
        eprintln!("{}", CliError::already_running(pid));
        return Ok(1);
    }

    if args.foreground {
        let status = client::run_daemon_foreground(&paths.project_root)?;
        return Ok(status.code().unwrap_or(2));
    }

    let child = client::spawn_daemon_background(&paths.project_root)?;
    match client::wait_for_socket(&paths, client::timeout_connect(), child).await {
        Ok(()) => {
            println!("daemon started for {}", paths.project_root.display());
            Ok(0)
        }
        Err(ClientError::DaemonStartFailed(detail)) => {
            eprintln!("error: failed to start daemon\n  -> {}", detail);
            Ok(2)
        }
        Err(ClientError::DaemonStartTimeout) => {
            eprintln!("error: timed out waiting for daemon to become ready");
            Ok(2)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn restart(project_root: &Path, args: StartArgs) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;
    if let Some(pid) = client::is_running(&paths) {
        super::stop::stop_pid(&paths, pid).await;
    }
    run(project_root, args).await
}
