// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hooksctl stop`

use std::path::Path;

use anyhow::Result;

use crate::client::{self, ProjectPaths};
use crate::error::CliError;

pub async fn run(project_root: &Path) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;

    let Some(pid) = client::is_running(&paths) else {
        client::cleanup_stale_files(&paths);
        eprintln!("{}", CliError::daemon_not_running());
        return Ok(1);
    };

    stop_pid(&paths, pid).await;
    println!("daemon stopped");
    Ok(0)
}

/// Send SIGTERM, wait, escalate to SIGKILL if the process is still alive,
/// then clean up whatever discovery files remain. Shared with `restart`.
pub async fn stop_pid(paths: &ProjectPaths, pid: u32) {
    client::send_signal(pid, "-TERM");
    if !client::wait_for_exit(pid, client::timeout_exit()).await && client::process_exists(pid) {
        client::send_signal(pid, "-KILL");
        client::wait_for_exit(pid, client::timeout_exit()).await;
    }
    client::cleanup_stale_files(paths);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(dir: &tempfile::TempDir) -> std::path::PathBuf {
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        dir.path().to_path_buf()
    }

    #[tokio::test]
    async fn reports_not_running_and_cleans_up_a_stale_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = project(&dir);
        let paths = ProjectPaths::resolve(&root).unwrap();
        std::fs::create_dir_all(paths.pid_path.parent().unwrap()).unwrap();
        std::fs::write(&paths.pid_path, "999999").unwrap();

        let code = run(&root).await.unwrap();
        assert_eq!(code, 1);
        assert!(!paths.pid_path.exists());
    }
}
