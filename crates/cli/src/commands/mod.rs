// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommand implementations. Each module owns its `clap::Args` type
//! and a `run` function returning the process exit code per the CLI
//! surface table.

pub mod bug_report;
pub mod config;
pub mod logs;
pub mod playbook;
pub mod start;
pub mod status;
pub mod stop;
