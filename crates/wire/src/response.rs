// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two response shapes the daemon sends back: success and error.

use hooks_core::{Decision, DispatchOutcome, EventType};
use serde::{Deserialize, Serialize};

/// `{ "decision": "allow"|"deny"|"ask", "reason": <string or null>,
///    "context": ["<string>", ...] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchResult {
    pub decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub context: Vec<String>,
}

impl From<DispatchOutcome> for DispatchResult {
    fn from(outcome: DispatchOutcome) -> Self {
        DispatchResult { decision: outcome.decision, reason: outcome.reason, context: outcome.context }
    }
}

/// Either shape the daemon writes back to a connection, tagged on
/// `request_id`'s presence alone per the wire format (not an internal
/// `#[serde(tag)]`, since the two shapes come straight off spec): a success
/// carries `result`+`timing_ms` (and, rarely, an `error` alongside it -- a
/// handler chain that blew its deadline, always paired with an `allow`), an
/// error carries `error`+`details`+`event_type` with no decision at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Success {
        request_id: String,
        result: DispatchResult,
        timing_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Error {
        request_id: Option<String>,
        error: String,
        #[serde(default)]
        details: Vec<String>,
        event_type: Option<EventType>,
    },
}

impl Response {
    pub fn success(request_id: String, result: DispatchResult, timing_ms: u64) -> Self {
        Response::Success { request_id, result, timing_ms, error: None }
    }

    /// A success response whose handler chain still reached a decision but
    /// hit a problem along the way (e.g. a handler timeout) that the caller
    /// should see and log without the decision itself being discarded.
    pub fn success_with_error(
        request_id: String,
        result: DispatchResult,
        timing_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Response::Success { request_id, result, timing_ms, error: Some(error.into()) }
    }

    pub fn error(
        request_id: Option<String>,
        error: impl Into<String>,
        details: Vec<String>,
        event_type: Option<EventType>,
    ) -> Self {
        Response::Error { request_id, error: error.into(), details, event_type }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            Response::Success { request_id, .. } => Some(request_id),
            Response::Error { request_id, .. } => request_id.as_deref(),
        }
    }
}
