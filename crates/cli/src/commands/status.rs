// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hooksctl status`

use std::path::Path;

use anyhow::Result;

use crate::client::{self, ProjectPaths};

pub fn run(project_root: &Path) -> Result<i32> {
    let paths = ProjectPaths::resolve(project_root)?;

    match client::is_running(&paths) {
        Some(pid) => {
            println!("running (pid {})", pid);
            println!("socket: {}", paths.socket_path.display());
            Ok(0)
        }
        None => {
            println!("not running");
            Ok(1)
        }
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
    fn reports_not_running_with_no_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = project(&dir);
        assert_eq!(run(&root).unwrap(), 1);
    }

    #[test]
    fn reports_running_for_a_live_pid() {
        let dir = tempfile::tempdir().unwrap();
        let root = project(&dir);
        let paths = ProjectPaths::resolve(&root).unwrap();
        std::fs::create_dir_all(paths.pid_path.parent().unwrap()).unwrap();
        std::fs::write(&paths.pid_path, std::process::id().to_string()).unwrap();
        assert_eq!(run(&root).unwrap(), 0);
    }
}
