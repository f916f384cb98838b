// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! hooksd: the per-project hook-dispatch daemon.
//!
//! Accepts one connection per hook invocation, dispatches it through the
//! configured handler chain, and shuts itself down after an idle period or
//! on signal.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lifecycle;
mod server;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::lifecycle::{Config, LifecycleError};

/// Written to the log before anything else so a CLI waiting on startup can
/// find where the current attempt begins: "--- hooksd: starting (pid: N) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- hooksd: starting (pid: ";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let project_root = if args.len() > 1 { PathBuf::from(&args[1]) } else { std::env::current_dir()? };

    let config = Config::for_project(&project_root)?;

    write_startup_marker(&config)?;
    let _log_guard = setup_logging(&config)?;

    info!(project = %project_root.display(), "starting hooksd");

    let mut daemon = match lifecycle::startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            write_startup_error(&config, &e);
            error!("failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(socket = %daemon.config.socket_path.display(), "daemon ready");
    println!("READY");

    let last_activity = Arc::new(Mutex::new(Instant::now()));
    let idle_check_interval = Duration::from_secs(10).min(daemon.idle_timeout);

    loop {
        tokio::select! {
            result = daemon.listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        *last_activity.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
                        if let Err(e) = server::handle_connection(&daemon, stream).await {
                            error!("error handling connection: {}", e);
                        }
                    }
                    Err(e) => error!("error accepting connection: {}", e),
                }
            }

            _ = tokio::time::sleep(idle_check_interval) => {
                let idle_for = last_activity.lock().unwrap_or_else(|e| e.into_inner()).elapsed();
                if idle_for > daemon.idle_timeout {
                    info!(idle_for_secs = idle_for.as_secs(), "idle timeout reached, shutting down");
                    daemon.shutdown();
                    break;
                }
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                daemon.shutdown();
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                daemon.shutdown();
                break;
            }
        }
    }

    info!("daemon stopped");
    Ok(())
}

fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;
    let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path) else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dir = config.log_path.parent().ok_or_else(|| LifecycleError::Io(std::io::Error::other("log path has no parent")))?;
    let file_name = config.log_path.file_name().ok_or_else(|| LifecycleError::Io(std::io::Error::other("log path has no file name")))?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
