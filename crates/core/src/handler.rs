// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The handler contract and the registry that holds configured handlers in
//! dispatch order. A handler's own decision logic is an external
//! collaborator this crate only describes the shape of; the one built-in
//! handler here exists purely so the registry and dispatcher have
//! something real to run in their own tests.

use crate::config::HandlerConfig;
use crate::decision::HandlerResult;
use crate::event::{Event, EventType};
use crate::session::SessionState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Something that can look at an event and a session snapshot and render a
/// verdict. Implementations must not block the executor thread; anything
/// that touches the filesystem, a process, or the network should do so
/// through `tokio`'s async primitives.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Whether this handler has an opinion on the given event at all. A
    /// handler whose `matches` returns `false` is skipped without its
    /// `handle` method being called.
    fn matches(&self, event: &Event) -> bool;

    async fn handle(&self, event: &Event, session: &SessionState) -> HandlerResult;
}

/// Constructs a `Handler` from its name and configured attributes. Real
/// domain handlers register a factory with the daemon binary at link time
/// (see the daemon crate's `main.rs`); this crate has no mechanism for
/// loading handlers from outside the binary (no dynamic loading, no
/// scripting layer) by design.
pub trait HandlerFactory: Send + Sync {
    fn build(&self, config: &HandlerConfig) -> Arc<dyn Handler>;
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("handler '{name}' is configured for event '{event}' but no factory is registered for it")]
    UnknownHandler { name: String, event: String },
    #[error("handlers '{a}' and '{b}' share priority {priority} for event '{event}'")]
    DuplicatePriority { a: String, b: String, priority: i64, event: String },
}

/// One handler, resolved and ready to run, in its configured position.
pub struct RegisteredHandler {
    pub name: String,
    pub event_type: EventType,
    pub priority: i64,
    pub terminal: bool,
    pub handler: Arc<dyn Handler>,
}

/// The frozen, priority-ordered list of handlers for every event type.
/// Built once at daemon startup; dispatch never mutates it.
pub struct HandlerRegistry {
    by_event: HashMap<EventType, Vec<RegisteredHandler>>,
}

impl HandlerRegistry {
    pub fn build(
        configs: &[(String, HandlerConfig)],
        factories: &HashMap<String, Arc<dyn HandlerFactory>>,
    ) -> Result<Self, RegistryError> {
        let mut by_event: HashMap<EventType, Vec<RegisteredHandler>> = HashMap::new();

        for (name, cfg) in configs {
            if !cfg.enabled {
                continue;
            }
            let factory = factories.get(name).ok_or_else(|| RegistryError::UnknownHandler {
                name: name.clone(),
                event: cfg.event_type.to_string(),
            })?;
            let handler = factory.build(cfg);
            by_event.entry(cfg.event_type).or_default().push(RegisteredHandler {
                name: name.clone(),
                event_type: cfg.event_type,
                priority: cfg.priority,
                terminal: cfg.terminal,
                handler,
            });
        }

        for (event_type, handlers) in &mut by_event {
            handlers.sort_by_key(|h| h.priority);
            for pair in handlers.windows(2) {
                if pair[0].priority == pair[1].priority {
                    return Err(RegistryError::DuplicatePriority {
                        a: pair[0].name.clone(),
                        b: pair[1].name.clone(),
                        priority: pair[0].priority,
                        event: event_type.to_string(),
                    });
                }
            }
        }

        Ok(Self { by_event })
    }

    pub fn handlers_for(&self, event_type: EventType) -> &[RegisteredHandler] {
        self.by_event.get(&event_type).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Allows everything. Used by `init-config --minimal` and by the
/// dispatcher's own tests as a stand-in for a real domain handler.
pub struct AlwaysAllowHandler;

#[async_trait]
impl Handler for AlwaysAllowHandler {
    fn matches(&self, _event: &Event) -> bool {
        true
    }

    async fn handle(&self, _event: &Event, _session: &SessionState) -> HandlerResult {
        HandlerResult::allow()
    }
}

pub struct AlwaysAllowFactory;

impl HandlerFactory for AlwaysAllowFactory {
    fn build(&self, _config: &HandlerConfig) -> Arc<dyn Handler> {
        Arc::new(AlwaysAllowHandler)
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
