// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, stale-PID recovery.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use hooks_core::{Config as HandlerConfig, Dispatcher, HandlerRegistry, SharedSessionState};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Per-project paths the daemon needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_root: PathBuf,
    pub socket_path: PathBuf,
    pub pid_path: PathBuf,
    pub version_path: PathBuf,
    pub log_path: PathBuf,
    pub config_path: PathBuf,
    pub discovery_path: PathBuf,
    /// Whether `socket_path` had to fall back to a non-default runtime
    /// directory (too-long default path). When true, startup publishes
    /// `discovery_path` so a forwarder that only tried the default can
    /// still find the real socket.
    pub uses_fallback_runtime_dir: bool,
}

impl Config {
    pub fn for_project(project_root: &Path) -> Result<Self, LifecycleError> {
        let canonical = hooks_core::identity::canonical_project_root(project_root)
            .map_err(|e| LifecycleError::ProjectNotFound(project_root.to_path_buf(), e))?;

        Ok(Self {
            socket_path: hooks_core::socket_path(&canonical)?,
            pid_path: hooks_core::pid_path(&canonical)?,
            version_path: hooks_core::version_path(&canonical)?,
            log_path: hooks_core::log_path(&canonical)?,
            config_path: canonical.join(".claude").join("hooks-daemon.toml"),
            discovery_path: hooks_core::discovery_path(&canonical),
            uses_fallback_runtime_dir: hooks_core::uses_fallback_runtime_dir(&canonical)?,
            project_root: canonical,
        })
    }
}

/// Live daemon state: the accepted listener, the built dispatcher, and
/// bookkeeping for the idle-shutdown timer.
pub struct DaemonState {
    pub config: Config,
    // Held only to keep the exclusive lock alive; released on drop.
    #[allow(dead_code)]
    pub(crate) lock_file: File,
    pub listener: UnixListener,
    pub dispatcher: Arc<Dispatcher>,
    pub idle_timeout: std::time::Duration,
    pub request_timeout: std::time::Duration,
}

impl DaemonState {
    /// Shut down gracefully: remove the files a forwarder or CLI would use
    /// to discover this daemon. The exclusive lock is released by dropping
    /// `lock_file` when `self` goes out of scope.
    pub fn shutdown(&mut self) {
        info!("shutting down");

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("failed to remove socket file: {}", e);
            }
        }
        if self.config.pid_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.pid_path) {
                warn!("failed to remove pid file: {}", e);
            }
        }
        if self.config.version_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.version_path) {
                warn!("failed to remove version file: {}", e);
            }
        }
        if self.config.discovery_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.discovery_path) {
                warn!("failed to remove discovery file: {}", e);
            }
        }

        info!("shutdown complete");
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("project not found at {0}: {1}")]
    ProjectNotFound(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Identity(#[from] hooks_core::IdentityError),

    #[error("daemon already running for this project (lock held on {0})")]
    LockHeld(PathBuf),

    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, #[source] std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] hooks_core::ConfigError),

    #[error("handler registry error: {0}")]
    Registry(#[from] hooks_core::handler::RegistryError),
}

/// Start the daemon for one project, cleaning up any partially-created
/// files if startup fails partway through.
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Acquire the exclusive lock FIRST, before touching the socket, so two
    // daemons racing to start for the same project never both get this far.
    // A stale PID file from a crashed daemon doesn't block this: fs2's lock
    // is process-scoped, so `try_lock_exclusive` succeeds the moment the
    // dead process's file descriptor is gone, recovering automatically.
    let mut lock_file = File::create(&config.pid_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(|_| LifecycleError::LockHeld(config.pid_path.clone()))?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    if let Some(parent) = config.version_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    let handler_config = load_config(&config.config_path)?;

    let registry = HandlerRegistry::build(&handler_config.handlers, &registered_factories())?;
    let session = SharedSessionState::default();
    let dispatcher = Arc::new(
        Dispatcher::new(registry, session, handler_config.validation_mode)
            .with_handler_timeout(std::time::Duration::from_secs(handler_config.request_timeout_secs)),
    );

    // Remove a stale socket, then bind last: anything that could fail
    // (config, registry) has already been checked by this point.
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    // Only published when the default runtime dir wasn't usable for this
    // project (socket path over the sockaddr_un budget): a forwarder tries
    // the default first and only consults this file when that fails.
    if config.uses_fallback_runtime_dir {
        if let Some(parent) = config.discovery_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config.discovery_path, config.socket_path.to_string_lossy().as_bytes())?;
    }

    info!(project = %config.project_root.display(), socket = %config.socket_path.display(), "daemon started");

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        listener,
        dispatcher,
        idle_timeout: std::time::Duration::from_secs(handler_config.idle_timeout_secs),
        request_timeout: std::time::Duration::from_secs(handler_config.request_timeout_secs),
    })
}

fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.version_path.exists() {
        let _ = std::fs::remove_file(&config.version_path);
    }
    if config.pid_path.exists() {
        let _ = std::fs::remove_file(&config.pid_path);
    }
    if config.discovery_path.exists() {
        let _ = std::fs::remove_file(&config.discovery_path);
    }
}

/// Load the project's config, falling back to the in-process default when
/// no file is present (a project that has never run `init-config` still
/// gets a working, handler-free daemon).
fn load_config(path: &Path) -> Result<HandlerConfig, LifecycleError> {
    if !path.exists() {
        return Ok(HandlerConfig {
            log_level: "info".to_string(),
            idle_timeout_secs: 1800,
            request_timeout_secs: 60,
            validation_mode: hooks_core::ValidationMode::FailOpen,
            handlers: Vec::new(),
        });
    }
    Ok(HandlerConfig::load(path)?)
}

/// The only handler factory shipped in-tree: `always_allow`. Concrete
/// domain handlers (git safety, linting, and similar) are out of scope here
/// and are added by a project's own config-driven handler set, not by this
/// daemon binary.
fn registered_factories() -> std::collections::HashMap<String, Arc<dyn hooks_core::HandlerFactory>> {
    let mut m: std::collections::HashMap<String, Arc<dyn hooks_core::HandlerFactory>> = std::collections::HashMap::new();
    m.insert("always_allow".to_string(), Arc::new(hooks_core::AlwaysAllowFactory));
    m
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
