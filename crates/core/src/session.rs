// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide session state, refreshed by `Status` events and read by
//! every handler invocation.

use crate::event::{ContextWindow, Event, ModelInfo, WorkspaceInfo};
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime};

/// An immutable snapshot of what the daemon currently knows about the
/// assistant session it's serving. Handlers read a clone of this; nothing
/// they do can mutate the daemon's copy.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub session_id: Option<String>,
    pub model_id: Option<String>,
    pub model_display_name: Option<String>,
    pub workspace_dir: Option<String>,
    pub context_used_percentage: Option<f64>,
    pub last_updated: Option<Instant>,
    pub last_updated_wall: Option<SystemTime>,
}

impl SessionState {
    fn apply(&mut self, event: &Event) {
        self.session_id = Some(event.session_id.clone());
        if let Some(ModelInfo { id, display_name }) = &event.model {
            self.model_id = Some(id.clone());
            self.model_display_name = Some(display_name.clone());
        }
        if let Some(WorkspaceInfo { current_dir, .. }) = &event.workspace {
            self.workspace_dir = Some(current_dir.clone());
        }
        if let Some(cw) = &event.context_window {
            if let Some(pct) = ContextWindow::used_percentage(cw) {
                self.context_used_percentage = Some(pct);
            }
        }
        self.last_updated = Some(Instant::now());
        self.last_updated_wall = Some(SystemTime::now());
    }
}

/// Shared handle to the daemon's session state. Cheap to clone; every
/// clone sees the same underlying state.
#[derive(Clone, Default)]
pub struct SharedSessionState {
    inner: Arc<Mutex<SessionState>>,
}

impl SharedSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge fields carried on a `Status` (or any) event into the stored
    /// state. Fields absent on the event are left untouched.
    pub fn update_from_event(&self, event: &Event) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.apply(event);
    }

    /// A point-in-time copy, safe to hand to a handler without holding the
    /// lock across an `await`.
    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
