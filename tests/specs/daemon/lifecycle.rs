use crate::prelude::*;

#[test]
fn status_reports_not_running_for_a_fresh_project() {
    let project = Project::empty();
    let assert = project.hooksctl().args(["status"]).assert().failure().code(1);
    assert!(stdout(&assert).contains("not running"));
}

#[test]
fn start_then_status_then_stop_round_trips_through_the_pid_file() {
    let project = Project::empty();

    let started = project.hooksctl().args(["start"]).assert().success();
    assert!(stdout(&started).contains("daemon started"));

    let running = project.hooksctl().args(["status"]).assert().success();
    assert!(stdout(&running).contains("running (pid"));

    let stopped = project.hooksctl().args(["stop"]).assert().success();
    assert!(stdout(&stopped).contains("daemon stopped"));

    let after = project.hooksctl().args(["status"]).assert().failure().code(1);
    assert!(stdout(&after).contains("not running"));
}

#[test]
fn starting_a_second_time_while_running_reports_already_running() {
    let project = Project::empty();
    project.hooksctl().args(["start"]).assert().success();

    let second = project.hooksctl().args(["start"]).assert().failure().code(1);
    assert!(stderr(&second).to_lowercase().contains("already running"));

    project.hooksctl().args(["stop"]).assert().success();
}

#[test]
fn two_distinct_projects_get_independent_daemons() {
    let a = Project::empty();
    let b = Project::empty();

    a.hooksctl().args(["start"]).assert().success();
    b.hooksctl().args(["start"]).assert().success();

    let a_status = a.hooksctl().args(["status"]).assert().success();
    let b_status = b.hooksctl().args(["status"]).assert().success();
    assert!(stdout(&a_status).contains("socket:"));
    assert!(stdout(&b_status).contains("socket:"));
    similar_asserts::assert_ne!(stdout(&a_status), stdout(&b_status));

    a.hooksctl().args(["stop"]).assert().success();
    b.hooksctl().args(["stop"]).assert().success();
}
