// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-event-type required-field checks run on an `Event` before it reaches
//! the handler chain. Deliberately hand-rolled rather than built on a
//! generic JSON-Schema engine: the required-field set per event type is
//! small, fixed, and known at compile time, so a `match` is both clearer
//! and allocation-free on the hot path compared to a schema document
//! parsed and interpreted at runtime.

use crate::config::ValidationMode;
use crate::event::{Event, EventType};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("{event_type} requires field '{field}' but it was missing")]
    MissingField { event_type: EventType, field: &'static str },
}

struct EventSchema {
    required: &'static [&'static str],
}

fn schema_for(event_type: EventType) -> &'static EventSchema {
    static SCHEMAS: OnceLock<std::collections::HashMap<EventType, EventSchema>> = OnceLock::new();
    let table = SCHEMAS.get_or_init(|| {
        use EventType::*;
        let mut m = std::collections::HashMap::new();
        m.insert(PreToolUse, EventSchema { required: &["tool_name"] });
        m.insert(PostToolUse, EventSchema { required: &["tool_name", "tool_response"] });
        m.insert(SessionStart, EventSchema { required: &[] });
        m.insert(SessionEnd, EventSchema { required: &[] });
        m.insert(Stop, EventSchema { required: &[] });
        m.insert(SubagentStop, EventSchema { required: &[] });
        m.insert(PreCompact, EventSchema { required: &[] });
        m.insert(UserPromptSubmit, EventSchema { required: &["prompt"] });
        m.insert(PermissionRequest, EventSchema { required: &["tool_name"] });
        m.insert(Notification, EventSchema { required: &["message"] });
        m.insert(Status, EventSchema { required: &[] });
        m
    });
    table.get(&event_type).expect("every EventType has a registered schema")
}

fn has_field(event: &Event, field: &str) -> bool {
    match field {
        "tool_name" => event.tool_name.is_some(),
        "tool_response" => event.tool_response.is_some(),
        "prompt" => event.prompt.is_some(),
        "message" => event.message.is_some(),
        _ => event.raw.get(field).is_some(),
    }
}

/// Check `event` against its event type's schema, returning every missing
/// required field (not just the first).
pub fn check(event: &Event) -> Vec<ValidationIssue> {
    let schema = schema_for(event.event_type);
    schema
        .required
        .iter()
        .filter(|field| !has_field(event, field))
        .map(|field| ValidationIssue::MissingField { event_type: event.event_type, field })
        .collect()
}

/// What the dispatcher should do with a failed validation, given the
/// configured mode.
pub enum ValidationAction {
    Proceed,
    DenyWithIssues(Vec<ValidationIssue>),
}

pub fn evaluate(event: &Event, mode: ValidationMode) -> ValidationAction {
    if matches!(mode, ValidationMode::Disabled) {
        return ValidationAction::Proceed;
    }
    let issues = check(event);
    if issues.is_empty() {
        return ValidationAction::Proceed;
    }
    match mode {
        ValidationMode::FailClosed => ValidationAction::DenyWithIssues(issues),
        ValidationMode::FailOpen | ValidationMode::Disabled => ValidationAction::Proceed,
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
