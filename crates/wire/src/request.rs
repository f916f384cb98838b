// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single request shape a forwarder sends the daemon.

use hooks_core::EventType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ "event": "<EventType>", "hook_input": { ... }, "request_id": "<opaque>" }`
///
/// `hook_input` is kept as an opaque JSON value here rather than pre-parsed
/// into `hooks_core::Event` — the daemon owns the mapping from wire shape to
/// domain type, so the wire crate has no dependency on how that mapping is
/// done beyond the event-type tag itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub event: EventType,
    pub hook_input: Value,
    pub request_id: String,
}
