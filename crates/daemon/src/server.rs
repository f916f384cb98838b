// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-connection handling: one request in, one response out.

use hooks_core::Event;
use hooks_wire::{self as wire, DispatchResult, Request, Response};
use tokio::net::UnixStream;
use tracing::{debug, error};

use crate::lifecycle::DaemonState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("protocol error: {0}")]
    Protocol(#[from] wire::ProtocolError),
}

/// Read one request off `stream`, dispatch it, and write back a response.
/// A connection carries exactly one request/response pair, matching the
/// forwarder's one-shot-per-hook-invocation usage.
pub async fn handle_connection(daemon: &DaemonState, stream: UnixStream) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match wire::read_request(&mut reader, daemon.request_timeout).await {
        Ok(req) => req,
        Err(wire::ProtocolError::ConnectionClosed) => {
            debug!("client disconnected before sending a request");
            return Ok(());
        }
        Err(wire::ProtocolError::Timeout) => {
            // Distinct from a handler-chain timeout: no request ever fully
            // arrived, so there is no event and nothing to dispatch.
            let response = Response::error(None, "request_read_timeout", vec![], None);
            wire::write_response(&mut writer, &response, daemon.request_timeout).await?;
            return Ok(());
        }
        Err(e) => {
            error!("failed to decode request: {}", e);
            let response = Response::error(None, "invalid_json", vec![], None);
            // Best effort: the client may already be gone.
            let _ = wire::write_response(&mut writer, &response, daemon.request_timeout).await;
            return Ok(());
        }
    };

    debug!(request_id = %request.request_id, event = %request.event, "received request");

    let response = handle_request(daemon, request).await;

    debug!("sending response");
    wire::write_response(&mut writer, &response, daemon.request_timeout).await?;

    Ok(())
}

async fn handle_request(daemon: &DaemonState, request: Request) -> Response {
    let event: Event = match serde_json::from_value(merge_event_shape(request.event, request.hook_input.clone())) {
        Ok(event) => event,
        Err(_) => {
            // A malformed payload from a well-behaved forwarder shouldn't
            // happen; tolerate it the same way the validator's fail-open
            // path does, rather than rejecting a request that could still
            // carry a useful event_type tag for the caller.
            Event {
                event_type: request.event,
                session_id: String::new(),
                cwd: None,
                transcript_path: None,
                tool_name: None,
                tool_input: None,
                tool_response: None,
                prompt: None,
                reason: None,
                message: None,
                model: None,
                workspace: None,
                context_window: None,
                raw: request.hook_input.clone(),
            }
        }
    };

    let start = std::time::Instant::now();

    match daemon.dispatcher.dispatch(event).await {
        Ok(outcome) => {
            let timing_ms = start.elapsed().as_millis() as u64;
            let chain_error = outcome.error.clone();
            let result = DispatchResult::from(outcome);
            match chain_error {
                Some(error) => Response::success_with_error(request.request_id, result, timing_ms, error),
                None => Response::success(request.request_id, result, timing_ms),
            }
        }
        Err(validation_failed) => Response::error(
            Some(request.request_id),
            "input_validation_failed",
            validation_failed.issues.iter().map(|i| i.to_string()).collect(),
            Some(validation_failed.event_type),
        ),
    }
}

/// `hooks_core::Event` expects `event_type` inline with the rest of the hook
/// fields, but the wire request keeps them separate (`event` tag,
/// `hook_input` body) so a forwarder never has to duplicate the tag inside
/// its payload. Splice the tag back in before deserializing.
fn merge_event_shape(event_type: hooks_core::EventType, hook_input: serde_json::Value) -> serde_json::Value {
    let mut merged = match hook_input {
        serde_json::Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("raw".to_string(), other);
            map
        }
    };
    merged.insert("event_type".to_string(), serde_json::to_value(event_type).unwrap_or_default());
    merged.entry("session_id").or_insert_with(|| serde_json::Value::String(String::new()));
    serde_json::Value::Object(merged)
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
