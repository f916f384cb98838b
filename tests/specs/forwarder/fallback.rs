use crate::prelude::*;

/// With a deliberately broken daemon binary path, the forwarder can never
/// bring a daemon up -- it must still fall open rather than block the tool
/// call that invoked it.
#[test]
fn forwarder_falls_open_when_the_daemon_cannot_be_started() {
    let project = Project::empty();

    let assert = project
        .hook_forward("PreToolUse")
        .env("HOOKS_DAEMON_BINARY", "/no/such/hooksd/binary")
        .write_stdin(r#"{"session_id":"s1","tool_name":"Bash"}"#)
        .assert()
        .success();

    let out = stdout(&assert);
    assert!(out.contains("\"decision\":\"allow\""));
}

#[test]
fn forwarder_rejects_an_unknown_event_type_with_exit_code_2() {
    let project = Project::empty();
    project.hook_forward("NotARealEvent").assert().failure().code(2);
}

#[test]
fn forwarder_treats_empty_stdin_as_an_empty_payload_and_still_falls_open() {
    let project = Project::empty();

    let assert = project
        .hook_forward("Status")
        .env("HOOKS_DAEMON_BINARY", "/no/such/hooksd/binary")
        .write_stdin("")
        .assert()
        .success();

    assert!(stdout(&assert).contains("\"decision\":\"allow\""));
}
