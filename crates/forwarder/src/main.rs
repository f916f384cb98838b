// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! hook-forward: the thin client an assistant invokes at each hook point.
//!
//! Reads the raw hook payload from stdin, ensures the project's daemon is
//! running, sends one request, and relays the decision back. Never blocks
//! the assistant's tool call on infrastructure failure: any connect,
//! protocol, or decode error falls open (an `allow` on stdout, exit 0) and
//! is logged to a forwarder-local log rather than surfaced to the caller.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod logging;

use std::io::Read;

use hooks_core::EventType;
use hooks_wire::{Request, Response};
use tracing::{error, warn};

use crate::client::{ClientError, ProjectPaths};

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code);
}

async fn run() -> i32 {
    let event = match std::env::args().nth(1).and_then(|s| s.parse::<EventType>().ok()) {
        Some(event) => event,
        None => {
            eprintln!("usage: hook-forward <event-type>");
            return 2;
        }
    };

    let hook_input = match read_stdin_json() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("error: could not read hook payload from stdin: {}", e);
            return fall_open();
        }
    };

    let project_root = match client::find_project_root() {
        Ok(root) => root,
        Err(_) => return fall_open(),
    };

    let paths = match ProjectPaths::resolve(&project_root) {
        Ok(paths) => paths,
        Err(_) => return fall_open(),
    };

    let _log_guard = logging::init(&paths.log_path).ok();

    let request = Request { event, hook_input, request_id: uuid::Uuid::new_v4().to_string() };

    match dispatch(&paths, request).await {
        Ok(response) => relay(response),
        Err(e) => {
            error!("forwarder infrastructure failure: {}", e);
            fall_open()
        }
    }
}

async fn dispatch(paths: &ProjectPaths, request: Request) -> Result<Response, ClientError> {
    let mut stream = client::connect_or_start(paths).await?;
    client::send(&mut stream, &request, REQUEST_TIMEOUT).await
}

fn read_stdin_json() -> Result<serde_json::Value, std::io::Error> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(&buf).map_err(std::io::Error::other)
}

/// Translate the daemon's response into the assistant's expected exit-code
/// contract: `allow`/`ask` print their decision as JSON on stdout and exit
/// 0; `deny` prints the reason on stderr and exits 2, the exit code the
/// assistant treats as "block this tool call".
fn relay(response: Response) -> i32 {
    match response {
        Response::Success { result, error, .. } => {
            if let Some(err) = &error {
                warn!(error = %err, "daemon reported an error alongside its decision");
            }
            relay_decision(result)
        }
        Response::Error { error, details, .. } => {
            warn!(error = %error, "daemon reported an error, falling open");
            for detail in &details {
                warn!("{}", detail);
            }
            fall_open()
        }
    }
}

fn relay_decision(result: hooks_wire::DispatchResult) -> i32 {
    match result.decision {
        hooks_core::Decision::Deny => {
            eprintln!("{}", result.reason.as_deref().unwrap_or("denied"));
            for note in &result.context {
                eprintln!("{}", note);
            }
            2
        }
        hooks_core::Decision::Allow | hooks_core::Decision::Ask => {
            let body = serde_json::json!({
                "decision": result.decision,
                "reason": result.reason,
                "context": result.context,
            });
            println!("{}", body);
            0
        }
    }
}

/// Never block the assistant's tool call on an infrastructure failure: emit
/// an `allow` decision and succeed.
fn fall_open() -> i32 {
    println!("{}", serde_json::json!({"decision": "allow", "reason": null, "context": []}));
    0
}
