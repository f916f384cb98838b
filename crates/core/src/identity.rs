// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project path derivation: every daemon instance is namespaced by a
//! hash of its project root, so a socket, PID file, and log file never
//! collide between two checkouts on the same machine.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const SOCKET_NAME_BUDGET: usize = 100; // stay comfortably under sockaddr_un's 108 bytes

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("project root does not exist: {0}")]
    ProjectNotFound(PathBuf),
    #[error("could not resolve a runtime directory (checked $CLAUDE_HOOKS_RUNTIME_DIR, $XDG_RUNTIME_DIR, $TMPDIR, /tmp)")]
    NoRuntimeDir,
    #[error("runtime directory {0} is too long for a unix socket path (need {needed} bytes, have budget {budget})", needed = .1, budget = SOCKET_NAME_BUDGET)]
    PathTooLong(PathBuf, usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// First 8 hex characters of the SHA-256 digest of the canonical project
/// root path. Deterministic, stable across process restarts, distinct for
/// any two paths a user is likely to have checked out side by side.
pub fn project_hash(canonical_root: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_root.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in &digest[..4] {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Resolve and canonicalize a project root, failing if it doesn't exist.
pub fn canonical_project_root(project_root: &Path) -> Result<PathBuf, IdentityError> {
    project_root
        .canonicalize()
        .map_err(|_| IdentityError::ProjectNotFound(project_root.to_path_buf()))
}

/// Where per-project runtime files (socket, discovery file) live. Checked,
/// in order: `$CLAUDE_HOOKS_RUNTIME_DIR`, `$XDG_RUNTIME_DIR/claude-hooks`,
/// `$TMPDIR/claude-hooks`, `/tmp/claude-hooks`.
///
/// This is the *preferred* candidate only: an explicit
/// `CLAUDE_HOOKS_RUNTIME_DIR` is a test/override escape hatch and has no
/// fallback (a caller who set it gets exactly that directory or an error);
/// everything else is the first of an ordered fallback list tried by
/// `resolve_runtime_dir` against the specific project's socket filename.
pub fn runtime_dir() -> Result<PathBuf, IdentityError> {
    runtime_dir_candidates().into_iter().next().ok_or(IdentityError::NoRuntimeDir)
}

/// Ordered candidates for the runtime directory. An explicit
/// `CLAUDE_HOOKS_RUNTIME_DIR` short-circuits to a single candidate (no
/// fallback); otherwise `$XDG_RUNTIME_DIR/claude-hooks`,
/// `$TMPDIR/claude-hooks`, `/tmp/claude-hooks` are tried in order.
fn runtime_dir_candidates() -> Vec<PathBuf> {
    if let Ok(dir) = std::env::var("CLAUDE_HOOKS_RUNTIME_DIR") {
        return vec![PathBuf::from(dir)];
    }
    let mut candidates = Vec::new();
    if let Ok(xdg) = std::env::var("XDG_RUNTIME_DIR") {
        candidates.push(PathBuf::from(xdg).join("claude-hooks"));
    }
    if let Ok(tmp) = std::env::var("TMPDIR") {
        candidates.push(PathBuf::from(tmp).join("claude-hooks"));
    }
    candidates.push(PathBuf::from("/tmp/claude-hooks"));
    candidates
}

/// Pick the first runtime-dir candidate whose resulting socket path for
/// `canonical_root` fits the `sockaddr_un` budget. Returns the chosen
/// directory along with whether it is the *first* candidate (the
/// "default") — a daemon that had to fall further than that writes a
/// socket discovery file per spec.md §6 so a forwarder using the default
/// can still find it.
fn resolve_runtime_dir(canonical_root: &Path) -> Result<(PathBuf, bool), IdentityError> {
    let stem = file_stem(canonical_root);
    let name_len = stem.len() + ".sock".len() + 1; // +1 for the path separator
    let candidates = runtime_dir_candidates();
    let longest = candidates.last().cloned();

    for (i, dir) in candidates.iter().enumerate() {
        if dir.as_os_str().len() + name_len <= SOCKET_NAME_BUDGET {
            return Ok((dir.clone(), i == 0));
        }
    }

    Err(IdentityError::PathTooLong(
        longest.unwrap_or_else(|| PathBuf::from("/tmp/claude-hooks")),
        name_len,
    ))
}

/// Whether `canonical_root`'s socket had to fall back to a non-default
/// runtime directory. When true, the daemon writes a discovery file (see
/// `discovery_path`) so a forwarder trying the default first still finds
/// the real socket.
pub fn uses_fallback_runtime_dir(canonical_root: &Path) -> Result<bool, IdentityError> {
    let (_, is_default) = resolve_runtime_dir(canonical_root)?;
    Ok(!is_default)
}

/// Where per-project durable-ish state (logs, PID, version file) lives.
/// Distinct from `runtime_dir` because it has no socket-path length
/// constraint and should survive a reboot's `/tmp` wipe for log review.
pub fn state_dir() -> Result<PathBuf, IdentityError> {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("claude-hooks"));
    }
    let home = std::env::var("HOME").map_err(|_| IdentityError::NoRuntimeDir)?;
    Ok(PathBuf::from(home).join(".local/state/claude-hooks"))
}

/// Shared stem for the socket and PID file of one project: `claude-hooks-
/// <sanitized-basename>-<hash8>`. Identical basenames from two different
/// checkouts never collide because the hash is of the full canonical path,
/// not the basename.
fn file_stem(canonical_root: &Path) -> String {
    let hash = project_hash(canonical_root);
    let basename = sanitize_basename(canonical_root);
    format!("claude-hooks-{basename}-{hash}")
}

pub fn socket_path(canonical_root: &Path) -> Result<PathBuf, IdentityError> {
    let (dir, _) = resolve_runtime_dir(canonical_root)?;
    Ok(dir.join(format!("{}.sock", file_stem(canonical_root))))
}

/// Written under the project's `.claude` directory only when the computed
/// runtime_dir had to fall back to a shorter candidate than the default, so
/// a forwarder that only knows the project root (and tries the default
/// runtime_dir first) can still find the real socket. `canonical_root` is
/// always resolvable without touching the runtime_dir, so this never hits
/// the same length constraint the socket path does.
pub fn discovery_path(canonical_root: &Path) -> PathBuf {
    canonical_root.join(".claude").join("hooks-daemon.socket-path")
}

/// Same runtime_dir and stem as `socket_path`, `.pid` suffix instead of
/// `.sock` — per spec, the PID file sits alongside the socket, not in the
/// longer-lived state directory.
pub fn pid_path(canonical_root: &Path) -> Result<PathBuf, IdentityError> {
    let (dir, _) = resolve_runtime_dir(canonical_root)?;
    Ok(dir.join(format!("{}.pid", file_stem(canonical_root))))
}

pub fn version_path(canonical_root: &Path) -> Result<PathBuf, IdentityError> {
    Ok(project_state_dir(canonical_root)?.join("daemon.version"))
}

pub fn log_path(canonical_root: &Path) -> Result<PathBuf, IdentityError> {
    Ok(project_state_dir(canonical_root)?.join("daemon.log"))
}

fn project_state_dir(canonical_root: &Path) -> Result<PathBuf, IdentityError> {
    let hash = project_hash(canonical_root);
    Ok(state_dir()?.join("projects").join(hash))
}

/// Lowercased last path segment with anything outside `[a-z0-9_-]`
/// collapsed to `_`. Used for human-readable log prefixes and playbook
/// output; never used as the sole namespacing key (that's `project_hash`).
pub fn sanitize_basename(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "project".to_string());
    base.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
