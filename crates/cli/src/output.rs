// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting shared by the commands that can render more than one
//! shape (currently just `generate-playbook`).

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PlaybookFormat {
    Md,
    Json,
    Yaml,
}
