// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon process plumbing: path resolution, spawn, liveness checks, and
//! startup-log inspection. `hooksctl` never speaks the IPC wire protocol
//! itself -- every command here works off the PID file, the socket file's
//! existence, and the daemon's log, the same way the daemon lifecycle does.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("project root does not exist")]
    NoProjectRoot,
    #[error(transparent)]
    Identity(#[from] hooks_core::IdentityError),
    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),
    #[error("timed out waiting for daemon to become ready")]
    DaemonStartTimeout,
}

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// How long `start` waits for the socket file to appear before giving up.
pub fn timeout_connect() -> Duration {
    parse_duration_ms("HOOKS_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// How long `stop` waits for the process to exit after a signal.
pub fn timeout_exit() -> Duration {
    parse_duration_ms("HOOKS_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

pub fn poll_interval() -> Duration {
    parse_duration_ms("HOOKS_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Every path the daemon and this CLI agree on for one project.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub project_root: PathBuf,
    pub socket_path: PathBuf,
    pub pid_path: PathBuf,
    pub version_path: PathBuf,
    pub log_path: PathBuf,
    pub config_path: PathBuf,
}

impl ProjectPaths {
    pub fn resolve(project_root: &Path) -> Result<Self, ClientError> {
        let canonical = hooks_core::identity::canonical_project_root(project_root)
            .map_err(|_| ClientError::NoProjectRoot)?;

        Ok(Self {
            socket_path: hooks_core::socket_path(&canonical)?,
            pid_path: hooks_core::pid_path(&canonical)?,
            version_path: hooks_core::version_path(&canonical)?,
            log_path: hooks_core::log_path(&canonical)?,
            config_path: canonical.join(".claude").join("hooks-daemon.toml"),
            project_root: canonical,
        })
    }
}

/// Find the project root: `CLAUDE_HOOKS_PROJECT_ROOT` env var first (set
/// for agents running in a workspace that differs from cwd), then walk up
/// from the current directory looking for a `.claude` directory, falling
/// back to the current directory itself.
pub fn find_project_root() -> Result<PathBuf, ClientError> {
    if let Ok(root) = std::env::var("CLAUDE_HOOKS_PROJECT_ROOT") {
        return Ok(PathBuf::from(root));
    }

    let mut current = std::env::current_dir().map_err(|_| ClientError::NoProjectRoot)?;
    loop {
        if current.join(".claude").is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            return std::env::current_dir().map_err(|_| ClientError::NoProjectRoot);
        }
    }
}

/// Read the daemon's PID from its PID file, if present.
pub fn read_daemon_pid(paths: &ProjectPaths) -> Option<u32> {
    std::fs::read_to_string(&paths.pid_path).ok()?.trim().parse().ok()
}

/// Whether a process with the given PID exists. Shells out to `kill -0`
/// rather than pulling in a process-inspection crate for a single check.
pub fn process_exists(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Whether the daemon is currently running for this project: the PID file
/// names a live process. A stale PID file (process gone) counts as "not
/// running", matching the stale-recovery behavior the daemon itself gives
/// a fresh `start`.
pub fn is_running(paths: &ProjectPaths) -> Option<u32> {
    let pid = read_daemon_pid(paths)?;
    process_exists(pid).then_some(pid)
}

pub fn send_signal(pid: u32, signal: &str) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(poll_interval()).await;
    }
    false
}

/// Remove whatever discovery files a clean shutdown would have removed.
/// Used both after a successful `stop` and when `stop` finds a stale PID
/// file pointing at a dead process.
pub fn cleanup_stale_files(paths: &ProjectPaths) {
    for p in [&paths.pid_path, &paths.socket_path, &paths.version_path] {
        if p.exists() {
            let _ = std::fs::remove_file(p);
        }
    }
}

/// Locate the `hooksd` binary: explicit override, sibling of the current
/// executable, cargo dev build dir, then bare `PATH` lookup.
fn find_hooksd_binary() -> PathBuf {
    if let Ok(path) = std::env::var("HOOKS_DAEMON_BINARY") {
        return PathBuf::from(path);
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("hooksd");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let dev_path =
            PathBuf::from(manifest_dir).parent().and_then(|p| p.parent()).map(|p| p.join("target/debug/hooksd"));
        if let Some(path) = dev_path {
            if path.exists() {
                return path;
            }
        }
    }

    PathBuf::from("hooksd")
}

/// Spawn `hooksd` detached in the background, returning the child handle
/// so the caller can notice an early exit (startup failure) while polling
/// for the socket to appear.
pub fn spawn_daemon_background(project_root: &Path) -> Result<std::process::Child, ClientError> {
    Command::new(find_hooksd_binary())
        .arg(project_root)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Run `hooksd` in the foreground, inheriting this process's stdio, and
/// block until it exits.
pub fn run_daemon_foreground(project_root: &Path) -> Result<std::process::ExitStatus, ClientError> {
    Command::new(find_hooksd_binary())
        .arg(project_root)
        .status()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Poll for the socket to appear, watching for the spawned child exiting
/// early (a startup failure) in the meantime.
pub async fn wait_for_socket(
    paths: &ProjectPaths,
    timeout: Duration,
    mut child: std::process::Child,
) -> Result<(), ClientError> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if paths.socket_path.exists() {
            return Ok(());
        }
        if let Ok(Some(status)) = child.try_wait() {
            let detail = read_startup_error(paths).unwrap_or_else(|| format!("exited with {}", status));
            return Err(ClientError::DaemonStartFailed(detail));
        }
        tokio::time::sleep(poll_interval()).await;
    }
    Err(ClientError::DaemonStartTimeout)
}

const STARTUP_MARKER_PREFIX: &str = "--- hooksd: starting (pid: ";

/// Read the daemon log from the last startup marker onward, looking for an
/// `ERROR` line. Returns `None` if the log has no error since that marker.
pub fn read_startup_error(paths: &ProjectPaths) -> Option<String> {
    let content = std::fs::read_to_string(&paths.log_path).ok()?;
    let start_pos = content.rfind(STARTUP_MARKER_PREFIX)?;
    let startup_log = &content[start_pos..];

    let errors: Vec<String> = startup_log
        .lines()
        .filter(|line| line.contains("ERROR"))
        .filter_map(|line| line.split_once(": ").map(|(_, msg)| msg.to_string()))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.join("\n"))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
