// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection to the per-project daemon: connect, lazy-start, send one
//! request, read one response. One forwarder invocation makes exactly one
//! connection and sends exactly one request, matching the daemon's
//! one-request-per-connection server loop.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use hooks_wire::{ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// How long to wait for an existing socket to accept a connection before
/// deciding the daemon needs to be (re)started.
pub fn timeout_connect() -> Duration {
    parse_duration_ms("HOOKS_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(2))
}

/// How long to wait for a freshly spawned daemon's socket to appear.
pub fn timeout_start() -> Duration {
    parse_duration_ms("HOOKS_TIMEOUT_START_MS").unwrap_or(Duration::from_secs(10))
}

pub fn poll_interval() -> Duration {
    parse_duration_ms("HOOKS_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

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
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// The handful of paths this forwarder needs, namespaced to one project.
pub struct ProjectPaths {
    pub project_root: PathBuf,
    pub socket_path: PathBuf,
    pub log_path: PathBuf,
}

impl ProjectPaths {
    pub fn resolve(project_root: &Path) -> Result<Self, ClientError> {
        let canonical = hooks_core::identity::canonical_project_root(project_root)
            .map_err(|_| ClientError::NoProjectRoot)?;

        Ok(Self {
            socket_path: hooks_core::socket_path(&canonical)?,
            log_path: hooks_core::log_path(&canonical)?,
            project_root: canonical,
        })
    }
}

/// Find the project root the same way the CLI does: an explicit env var
/// first, then the nearest ancestor with a `.claude` directory.
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

/// Connect to the daemon for this project, starting it if it isn't already
/// listening. Returns a connected stream ready for one request/response.
pub async fn connect_or_start(paths: &ProjectPaths) -> Result<UnixStream, ClientError> {
    if let Ok(Ok(stream)) = tokio::time::timeout(timeout_connect(), UnixStream::connect(&paths.socket_path)).await {
        return Ok(stream);
    }

    let child = spawn_daemon_background(&paths.project_root)?;
    wait_for_socket(paths, timeout_start(), child).await?;

    UnixStream::connect(&paths.socket_path).await.map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Send a request and read back exactly one response, both with the
/// request timeout as the bound.
pub async fn send(stream: &mut UnixStream, request: &Request, timeout: Duration) -> Result<Response, ClientError> {
    let (mut reader, mut writer) = stream.split();

    let data = hooks_wire::encode(request)?;
    tokio::time::timeout(timeout, hooks_wire::write_message(&mut writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)??;

    let bytes = tokio::time::timeout(timeout, hooks_wire::read_message(&mut reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;

    Ok(hooks_wire::decode(&bytes)?)
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

fn spawn_daemon_background(project_root: &Path) -> Result<std::process::Child, ClientError> {
    Command::new(find_hooksd_binary())
        .arg(project_root)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

const STARTUP_MARKER_PREFIX: &str = "--- hooksd: starting (pid: ";

fn read_startup_error(paths: &ProjectPaths) -> Option<String> {
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

async fn wait_for_socket(
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

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
