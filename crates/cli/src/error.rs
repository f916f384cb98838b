// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: Vec::new(), suggestions: Vec::new() }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn daemon_not_running() -> Self {
        CliError::new("daemon is not running")
            .with_suggestion("start it with: hooksctl start")
    }

    pub fn already_running(pid: u32) -> Self {
        CliError::new(format!("daemon is already running (pid {})", pid))
            .with_suggestion("stop it first with: hooksctl stop")
            .with_suggestion("or restart it with: hooksctl restart")
    }

    pub fn config_invalid(errors: &[String]) -> Self {
        let mut err = CliError::new("config is invalid");
        for e in errors {
            err = err.with_context(e.clone());
        }
        err.with_suggestion("fix the errors above and re-run validate-config")
    }

    pub fn config_exists(path: &std::path::Path) -> Self {
        CliError::new(format!("config already exists at {}", path.display()))
            .with_suggestion("pass --force to overwrite it")
    }
}
