// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration document, loaded once at daemon startup. Unlike the
//! bail-on-first-error style of a typical config parser, `validate`
//! collects every problem in the document so a user fixing their config
//! doesn't have to run the daemon once per mistake.

use crate::event::EventType;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io { path: std::path::PathBuf, #[source] source: std::io::Error },
    #[error("could not parse config file {path} as TOML: {source}")]
    Toml { path: std::path::PathBuf, #[source] source: toml::de::Error },
    #[error("config is invalid:\n{}", .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<ValidationError>),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("handler '{handler}' references unknown event type '{event_type}'")]
    UnknownEventType { handler: String, event_type: String },
    #[error("handler name '{0}' must match ^[a-z][a-z0-9_]*$")]
    InvalidHandlerName(String),
    #[error("handler '{handler}' has priority {priority}, outside the allowed range [{min}, {max}]")]
    PriorityOutOfRange { handler: String, priority: i64, min: i64, max: i64 },
    #[error("handlers '{a}' and '{b}' both have priority {priority} for event '{event_type}'")]
    DuplicatePriority { a: String, b: String, priority: i64, event_type: String },
    #[error("field '{field}' on handler '{handler}' should be {expected}, got {actual}")]
    TypeMismatch { handler: String, field: String, expected: String, actual: String },
    #[error("unknown log level '{0}' (expected one of: trace, debug, info, warn, error)")]
    UnknownLogLevel(String),
    #[error("config schema version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

const SUPPORTED_SCHEMA_VERSION: u32 = 1;
const PRIORITY_MIN: i64 = 5;
const PRIORITY_MAX: i64 = 60;

/// Raw, directly-deserialized shape of `.claude/hooks-daemon.toml`.
#[derive(Debug, Deserialize)]
pub struct RawConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub daemon: RawDaemonConfig,
    #[serde(default)]
    pub validation: RawValidationConfig,
    #[serde(default)]
    pub handlers: HashMap<String, RawHandlerConfig>,
}

fn default_schema_version() -> u32 {
    SUPPORTED_SCHEMA_VERSION
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDaemonConfig {
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawValidationConfig {
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawHandlerConfig {
    pub event_type: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub terminal: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: toml::Table,
}

fn default_true() -> bool {
    true
}

/// Validated, typed configuration used by the rest of the daemon.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub idle_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub validation_mode: ValidationMode,
    pub handlers: Vec<(String, HandlerConfig)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Disabled,
    FailOpen,
    FailClosed,
}

impl FromStr for ValidationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(ValidationMode::Disabled),
            "fail-open" => Ok(ValidationMode::FailOpen),
            "fail-closed" => Ok(ValidationMode::FailClosed),
            other => Err(ValidationError::TypeMismatch {
                handler: "validation".to_string(),
                field: "mode".to_string(),
                expected: "one of disabled, fail-open, fail-closed".to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub event_type: EventType,
    pub priority: i64,
    pub terminal: bool,
    pub enabled: bool,
    pub extra: toml::Table,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let raw: RawConfig = toml::from_str(&text)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })?;
        Self::from_raw(raw).map_err(ConfigError::Invalid)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Config, Vec<ValidationError>> {
        let mut errors = validate(&raw);

        let log_level = raw.daemon.log_level.clone().unwrap_or_else(|| "info".to_string());
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            errors.push(ValidationError::UnknownLogLevel(log_level.clone()));
        }

        let mut validation_mode = match raw.validation.mode.as_deref() {
            None => ValidationMode::FailOpen,
            Some(s) => match s.parse() {
                Ok(m) => m,
                Err(e) => {
                    errors.push(e);
                    ValidationMode::FailOpen
                }
            },
        };
        apply_validation_env_overrides(&mut validation_mode, &mut errors);

        let mut handlers = Vec::new();
        for (name, raw_handler) in &raw.handlers {
            if let Ok(event_type) = raw_handler.event_type.parse::<EventType>() {
                handlers.push((
                    name.clone(),
                    HandlerConfig {
                        event_type,
                        priority: raw_handler.priority,
                        terminal: raw_handler.terminal,
                        enabled: raw_handler.enabled,
                        extra: raw_handler.extra.clone(),
                    },
                ));
            }
        }
        handlers.sort_by(|a, b| a.0.cmp(&b.0));

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Config {
            log_level,
            idle_timeout_secs: raw.daemon.idle_timeout_secs.unwrap_or(1800),
            request_timeout_secs: raw.daemon.request_timeout_secs.unwrap_or(60),
            validation_mode,
            handlers,
        })
    }
}

fn parse_env_bool(var: &str, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ValidationError::TypeMismatch {
            handler: "environment".to_string(),
            field: var.to_string(),
            expected: "a boolean (true/false)".to_string(),
            actual: other.to_string(),
        }),
    }
}

/// Applies `HOOKS_DAEMON_INPUT_VALIDATION` and `HOOKS_DAEMON_VALIDATION_STRICT`
/// on top of whatever the config file set, per spec.md §6. A bad value for
/// either is a startup error, not a silently-ignored override.
fn apply_validation_env_overrides(mode: &mut ValidationMode, errors: &mut Vec<ValidationError>) {
    if let Ok(value) = std::env::var("HOOKS_DAEMON_INPUT_VALIDATION") {
        match parse_env_bool("HOOKS_DAEMON_INPUT_VALIDATION", &value) {
            Ok(false) => *mode = ValidationMode::Disabled,
            Ok(true) => {
                if matches!(mode, ValidationMode::Disabled) {
                    *mode = ValidationMode::FailOpen;
                }
            }
            Err(e) => errors.push(e),
        }
    }

    if let Ok(value) = std::env::var("HOOKS_DAEMON_VALIDATION_STRICT") {
        match parse_env_bool("HOOKS_DAEMON_VALIDATION_STRICT", &value) {
            Ok(true) => *mode = ValidationMode::FailClosed,
            Ok(false) => {
                if matches!(mode, ValidationMode::FailClosed) {
                    *mode = ValidationMode::FailOpen;
                }
            }
            Err(e) => errors.push(e),
        }
    }
}

/// Matches spec.md §3's `^[a-z][a-z0-9_]*$`: lowercase ASCII letter first,
/// then lowercase letters, digits, or underscores. Hand-rolled rather than
/// pulling in a regex engine for one fixed pattern.
fn is_valid_handler_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Every validation rule that can be checked against the raw document
/// alone, collected rather than short-circuited.
pub fn validate(raw: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if raw.schema_version != SUPPORTED_SCHEMA_VERSION {
        errors.push(ValidationError::VersionMismatch {
            found: raw.schema_version,
            expected: SUPPORTED_SCHEMA_VERSION,
        });
    }

    let mut by_event: HashMap<EventType, Vec<(&String, i64)>> = HashMap::new();

    for (name, handler) in &raw.handlers {
        if !is_valid_handler_name(name) {
            errors.push(ValidationError::InvalidHandlerName(name.clone()));
        }

        match handler.event_type.parse::<EventType>() {
            Ok(event_type) => {
                if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&handler.priority) {
                    errors.push(ValidationError::PriorityOutOfRange {
                        handler: name.clone(),
                        priority: handler.priority,
                        min: PRIORITY_MIN,
                        max: PRIORITY_MAX,
                    });
                }
                by_event.entry(event_type).or_default().push((name, handler.priority));
            }
            Err(_) => errors.push(ValidationError::UnknownEventType {
                handler: name.clone(),
                event_type: handler.event_type.clone(),
            }),
        }
    }

    for (event_type, mut entries) in by_event {
        entries.sort_by_key(|(_, p)| *p);
        for pair in entries.windows(2) {
            if pair[0].1 == pair[1].1 {
                errors.push(ValidationError::DuplicatePriority {
                    a: pair[0].0.clone(),
                    b: pair[1].0.clone(),
                    priority: pair[0].1,
                    event_type: event_type.to_string(),
                });
            }
        }
    }

    errors
}

/// Rendered document for `init-config`.
pub fn default_document(minimal: bool) -> String {
    if minimal {
        MINIMAL_TEMPLATE.to_string()
    } else {
        FULL_TEMPLATE.to_string()
    }
}

const MINIMAL_TEMPLATE: &str = r#"schema_version = 1

[daemon]
log_level = "info"

[validation]
mode = "fail-open"
"#;

const FULL_TEMPLATE: &str = r#"schema_version = 1

[daemon]
log_level = "info"
idle_timeout_secs = 1800
request_timeout_secs = 60

[validation]
# disabled | fail-open | fail-closed
mode = "fail-open"

# [handlers.example]
# event_type = "PreToolUse"
# priority = 0
# terminal = true
# enabled = true
"#;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
