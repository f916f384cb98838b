// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forwarder-local logging: a separate file from the daemon's own log, since
//! the forwarder runs as a short-lived, per-event process and its failures
//! (connect timeouts, decode errors) are diagnostically distinct from the
//! daemon's own.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;

pub fn forwarder_log_path(canonical_root: &Path) -> std::io::Result<PathBuf> {
    let state_dir = hooks_core::state_dir().map_err(std::io::Error::other)?;
    let hash = hooks_core::project_hash(canonical_root);
    Ok(state_dir.join("projects").join(hash).join("forward.log"))
}

/// Initialize a file-backed subscriber for this invocation. Returns the
/// guard that must stay alive for the duration of the process for buffered
/// writes to flush.
pub fn init(log_path: &Path) -> std::io::Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dir = log_path.parent().ok_or_else(|| std::io::Error::other("log path has no parent"))?;
    let file_name = log_path.file_name().ok_or_else(|| std::io::Error::other("log path has no file name"))?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Best effort: a second forwarder invocation racing to install a global
    // subscriber in the same process would be unusual (each invocation is
    // its own process), so ignore an already-set error rather than panic.
    let _ = tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).try_init();

    Ok(guard)
}
