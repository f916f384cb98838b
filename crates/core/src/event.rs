// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook event types forwarded from the assistant into the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The closed set of hook events the daemon will dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EventType {
    PreToolUse,
    PostToolUse,
    SessionStart,
    SessionEnd,
    Stop,
    SubagentStop,
    PreCompact,
    UserPromptSubmit,
    PermissionRequest,
    Notification,
    Status,
}

impl EventType {
    pub const ALL: [EventType; 11] = [
        EventType::PreToolUse,
        EventType::PostToolUse,
        EventType::SessionStart,
        EventType::SessionEnd,
        EventType::Stop,
        EventType::SubagentStop,
        EventType::PreCompact,
        EventType::UserPromptSubmit,
        EventType::PermissionRequest,
        EventType::Notification,
        EventType::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PreToolUse => "PreToolUse",
            EventType::PostToolUse => "PostToolUse",
            EventType::SessionStart => "SessionStart",
            EventType::SessionEnd => "SessionEnd",
            EventType::Stop => "Stop",
            EventType::SubagentStop => "SubagentStop",
            EventType::PreCompact => "PreCompact",
            EventType::UserPromptSubmit => "UserPromptSubmit",
            EventType::PermissionRequest => "PermissionRequest",
            EventType::Notification => "Notification",
            EventType::Status => "Status",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

/// A single hook invocation as forwarded by the assistant, plus the
/// identifiers the daemon needs to route and log it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub session_id: String,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Option<Value>,
    #[serde(default)]
    pub tool_response: Option<Value>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub model: Option<ModelInfo>,
    #[serde(default)]
    pub workspace: Option<WorkspaceInfo>,
    #[serde(default)]
    pub context_window: Option<ContextWindow>,
    /// Raw payload as received, for fields this struct doesn't name
    /// explicitly; handlers that need something outside the common set
    /// read it from here.
    #[serde(default)]
    pub raw: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub current_dir: String,
    #[serde(default)]
    pub project_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextWindow {
    pub context_window_size: u64,
    #[serde(default)]
    pub current_usage: Option<CurrentUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
}

impl ContextWindow {
    /// Fraction of the window currently in use, 0.0-100.0.
    pub fn used_percentage(&self) -> Option<f64> {
        let usage = self.current_usage.as_ref()?;
        if self.context_window_size == 0 {
            return None;
        }
        let used = usage.input_tokens
            + usage.output_tokens
            + usage.cache_creation_input_tokens
            + usage.cache_read_input_tokens;
        Some((used as f64 / self.context_window_size as f64) * 100.0)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
