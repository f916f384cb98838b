// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatcher: takes one event, runs it through the configured handler
//! chain for its event type in priority order, and produces a single
//! outcome.

use crate::config::ValidationMode;
use crate::decision::{Decision, DispatchOutcome};
use crate::event::{Event, EventType};
use crate::handler::{HandlerRegistry, RegisteredHandler};
use crate::session::{SessionState, SharedSessionState};
use crate::validate::{self, ValidationAction, ValidationIssue};
use std::time::Duration;
use tracing::warn;

/// Used only when nothing calls `with_handler_timeout`: spec.md §4.7 gives
/// the daemon's own default as 60s, configured per project via
/// `daemon.request_timeout_secs`.
const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(60);

/// Raised when the input validator is configured fail-closed and the event
/// fails its schema check. Distinct from `DispatchOutcome`: this is a
/// protocol-level rejection that never reaches a handler, not a decision any
/// handler rendered.
#[derive(Debug, Clone, thiserror::Error)]
#[error("input validation failed for {event_type}")]
pub struct ValidationFailed {
    pub event_type: EventType,
    pub issues: Vec<ValidationIssue>,
}

pub struct Dispatcher {
    registry: HandlerRegistry,
    session: SharedSessionState,
    validation_mode: ValidationMode,
    handler_timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry, session: SharedSessionState, validation_mode: ValidationMode) -> Self {
        Self { registry, session, validation_mode, handler_timeout: DEFAULT_HANDLER_TIMEOUT }
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    pub fn session(&self) -> &SharedSessionState {
        &self.session
    }

    /// Run one event through the full pipeline: session-state update,
    /// validation, and (absent a fail-closed rejection) the ordered handler
    /// chain for its event type.
    ///
    /// The whole chain runs under one deadline (`handler_timeout`, spec.md
    /// §4.7 step 5): if it hasn't produced a verdict by then, the chain is
    /// abandoned outright and this reports a clean `allow` tagged with
    /// `error: "handler_timeout"`, never a partial decision from whatever
    /// handlers happened to finish first.
    pub async fn dispatch(&self, event: Event) -> Result<DispatchOutcome, ValidationFailed> {
        // Status events (and any event carrying session-shaped fields) update
        // the shared session state before dispatch, so even the event that
        // triggered the update observes the fresh snapshot.
        if event.event_type == EventType::Status {
            self.session.update_from_event(&event);
        }

        if let ValidationAction::DenyWithIssues(issues) = validate::evaluate(&event, self.validation_mode) {
            return Err(ValidationFailed { event_type: event.event_type, issues });
        }

        let session_snapshot = self.session.snapshot();
        let handlers = self.registry.handlers_for(event.event_type);

        match tokio::time::timeout(self.handler_timeout, run_handler_chain(handlers, event, session_snapshot)).await {
            Ok(outcome) => Ok(outcome),
            Err(_timeout) => {
                warn!(timeout_secs = self.handler_timeout.as_secs(), "handler chain timed out, failing open");
                Ok(DispatchOutcome {
                    decision: Decision::Allow,
                    reason: None,
                    handler: None,
                    context: Vec::new(),
                    error: Some("handler_timeout".to_string()),
                })
            }
        }
    }
}

/// Run every matching handler for this event in priority order, isolating
/// each call behind its own `tokio::spawn` so a panic in one handler can't
/// take down the chain (P5): a panicked handler is treated as if it had
/// nothing to say, and the chain moves on to the next one.
async fn run_handler_chain(
    handlers: &[RegisteredHandler],
    event: Event,
    session_snapshot: SessionState,
) -> DispatchOutcome {
    let mut context = Vec::new();
    let mut decision = Decision::Allow;
    let mut reason = None;
    let mut handler_name = None;

    for registered in handlers {
        if !registered.handler.matches(&event) {
            continue;
        }

        let handler = registered.handler.clone();
        let event_clone = event.clone();
        let session_clone = session_snapshot.clone();
        let call = tokio::spawn(async move { handler.handle(&event_clone, &session_clone).await });

        let result = match call.await {
            // Handler returned normally.
            Ok(result) => result,
            // Handler panicked: fail open, the chain continues as if this
            // handler had nothing to say.
            Err(_join_error) => continue,
        };

        context.extend(result.context);

        if result.decision.blocks_continuation() {
            // A `deny` or `ask` is recorded as the current verdict
            // regardless of termination; a later handler's denial still
            // overwrites an earlier one (last-seen wins), and only a
            // *terminal* handler actually stops the chain.
            decision = result.decision;
            reason = result.reason;
            handler_name = Some(registered.name.clone());

            if registered.terminal {
                break;
            }
        }
        // An `allow` never stops the chain, even from a terminal handler:
        // "terminal" means "stops on denial", not "stops here
        // unconditionally".
    }

    DispatchOutcome { decision, reason, handler: handler_name, context, error: None }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
