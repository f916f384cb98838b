use crate::prelude::*;

#[test]
fn init_config_writes_a_template_that_validates_clean() {
    let project = Project::empty();

    let init = project.hooksctl().args(["init-config"]).assert().success();
    assert!(stdout(&init).contains("wrote"));

    let validate = project.hooksctl().args(["validate-config"]).assert().success();
    assert!(stdout(&validate).contains("valid"));
}

#[test]
fn init_config_refuses_to_clobber_an_existing_file_without_force() {
    let project = Project::empty();
    project.write_config("schema_version = 1\n");

    let blocked = project.hooksctl().args(["init-config"]).assert().failure().code(1);
    assert!(stderr(&blocked).to_lowercase().contains("exists"));

    let forced = project.hooksctl().args(["init-config", "--force"]).assert().success();
    assert!(stdout(&forced).contains("wrote"));
}

#[test]
fn validate_config_reports_2_and_names_the_problem_for_an_out_of_range_priority() {
    let project = Project::empty();
    project.write_config(
        r#"
schema_version = 1

[handlers.example]
event_type = "PreToolUse"
priority = 999
"#,
    );

    let assert = project.hooksctl().args(["validate-config"]).assert().failure().code(2);
    assert!(stderr(&assert).contains("priority"));
}

#[test]
fn validate_config_reports_2_for_a_missing_file() {
    let project = Project::empty();
    let assert = project
        .hooksctl()
        .args(["validate-config", "nowhere.toml"])
        .assert()
        .failure()
        .code(2);
    assert!(stderr(&assert).contains("could not read"));
}

#[test]
fn generate_playbook_lists_an_enabled_handler_as_json() {
    let project = Project::empty();
    project.write_config(
        r#"
schema_version = 1

[handlers.example]
event_type = "PreToolUse"
priority = 10
terminal = false
enabled = true
"#,
    );

    let assert = project
        .hooksctl()
        .args(["generate-playbook", "--format", "json"])
        .assert()
        .success();
    let out = stdout(&assert);
    assert!(out.contains("\"example\""));
    assert!(out.contains("PreToolUse"));
}
