// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hooks-core: event, config, session, and handler-dispatch types shared
//! by the hook-dispatch daemon and its clients.

pub mod config;
pub mod decision;
pub mod dispatch;
pub mod event;
pub mod handler;
pub mod identity;
pub mod session;
pub mod validate;

pub use config::{Config, ConfigError, HandlerConfig, RawConfig, ValidationMode};
pub use decision::{Decision, DispatchOutcome, HandlerResult};
pub use dispatch::{Dispatcher, ValidationFailed};
pub use event::{Event, EventType};
pub use handler::{AlwaysAllowFactory, AlwaysAllowHandler, Handler, HandlerFactory, HandlerRegistry};
pub use identity::{
    discovery_path, log_path, pid_path, project_hash, runtime_dir, socket_path, state_dir,
    uses_fallback_runtime_dir, version_path, IdentityError,
};
pub use session::{SessionState, SharedSessionState};
pub use validate::{ValidationAction, ValidationIssue};
