// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatcher's verdict on an event, and the bookkeeping it carries.

use serde::{Deserialize, Serialize};

/// The three-way verdict a handler (or the dispatcher as a whole) can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
    Ask,
}

impl Decision {
    /// Whether this verdict should stop the rest of the handler chain from
    /// running. `Ask` is non-terminal in the config sense (a handler can be
    /// configured non-terminal) but for the purposes of "does the chain
    /// stop here" it behaves like `Deny`: an assistant can't proceed past an
    /// unresolved `ask` any more than it can past an outright `deny`.
    pub fn blocks_continuation(&self) -> bool {
        matches!(self, Decision::Deny | Decision::Ask)
    }
}

/// What a single handler invocation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerResult {
    pub decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Free-form notes accumulated into the final outcome even when this
    /// handler's decision was `Allow`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl HandlerResult {
    pub fn allow() -> Self {
        Self { decision: Decision::Allow, reason: None, context: Vec::new() }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self { decision: Decision::Deny, reason: Some(reason.into()), context: Vec::new() }
    }

    pub fn ask(reason: impl Into<String>) -> Self {
        Self { decision: Decision::Ask, reason: Some(reason.into()), context: Vec::new() }
    }

    pub fn with_context(mut self, note: impl Into<String>) -> Self {
        self.context.push(note.into());
        self
    }
}

/// The outcome of running the full handler chain for one event: the final
/// decision, which handler (if any) produced it, and every context note
/// accumulated along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
    /// Set when the whole handler chain blew past its deadline and was
    /// abandoned (`decision` is then always `Allow`, with no `handler` or
    /// `reason`). Distinct from `ValidationFailed`: this still reaches the
    /// caller as a normal outcome, not a rejected request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn allow() -> Self {
        Self { decision: Decision::Allow, reason: None, handler: None, context: Vec::new(), error: None }
    }
}
