use super::*;
use serial_test::serial;

fn parse(toml_src: &str) -> RawConfig {
    toml::from_str(toml_src).expect("fixture toml should parse")
}

#[test]
fn minimal_document_validates_cleanly() {
    let raw = parse(MINIMAL_TEMPLATE);
    assert!(validate(&raw).is_empty());
    assert!(Config::from_raw(raw).is_ok());
}

#[test]
fn full_document_validates_cleanly() {
    let raw = parse(FULL_TEMPLATE);
    assert!(validate(&raw).is_empty());
}

#[test]
fn collects_every_error_instead_of_the_first() {
    let raw = parse(
        r#"
        schema_version = 7

        [handlers.a]
        event_type = "NotARealEvent"
        priority = 5000

        [handlers."  "]
        event_type = "PreToolUse"
        priority = 5
        "#,
    );
    let errors = validate(&raw);
    // version mismatch + unknown event type (a) + priority out of range (a)
    // + invalid handler name (blank) = at least 4 independent problems, all
    // surfaced at once.
    assert!(errors.len() >= 4, "expected multiple errors, got {errors:?}");
    assert!(errors.iter().any(|e| matches!(e, ValidationError::VersionMismatch { .. })));
    assert!(errors.iter().any(|e| matches!(e, ValidationError::UnknownEventType { .. })));
    assert!(errors.iter().any(|e| matches!(e, ValidationError::PriorityOutOfRange { .. })));
    assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidHandlerName(_))));
}

#[test]
fn handler_names_violating_the_naming_pattern_are_rejected() {
    let raw = parse(
        r#"
        [handlers.Foo]
        event_type = "PreToolUse"
        priority = 5

        [handlers."1abc"]
        event_type = "PreToolUse"
        priority = 6

        [handlers."bad-name"]
        event_type = "PreToolUse"
        priority = 7
        "#,
    );
    let errors = validate(&raw);
    let invalid_names: Vec<&String> = errors
        .iter()
        .filter_map(|e| match e {
            ValidationError::InvalidHandlerName(name) => Some(name),
            _ => None,
        })
        .collect();
    assert!(invalid_names.contains(&&"Foo".to_string()));
    assert!(invalid_names.contains(&&"1abc".to_string()));
    assert!(invalid_names.contains(&&"bad-name".to_string()));
}

#[test]
fn duplicate_priority_within_same_event_type_is_rejected() {
    let raw = parse(
        r#"
        [handlers.a]
        event_type = "PreToolUse"
        priority = 10

        [handlers.b]
        event_type = "PreToolUse"
        priority = 10
        "#,
    );
    let errors = validate(&raw);
    assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicatePriority { .. })));
}

#[test]
fn same_priority_across_different_event_types_is_allowed() {
    let raw = parse(
        r#"
        [handlers.a]
        event_type = "PreToolUse"
        priority = 10

        [handlers.b]
        event_type = "PostToolUse"
        priority = 10
        "#,
    );
    assert!(validate(&raw).is_empty());
}

#[test]
fn unknown_log_level_is_rejected() {
    let raw = parse(
        r#"
        [daemon]
        log_level = "verbose"
        "#,
    );
    let err = Config::from_raw(raw).unwrap_err();
    assert!(err.iter().any(|e| matches!(e, ValidationError::UnknownLogLevel(_))));
}

#[test]
fn disabled_handlers_still_validate_but_are_excluded_from_typed_config() {
    let raw = parse(
        r#"
        [handlers.off]
        event_type = "PreToolUse"
        priority = 10
        enabled = false
        "#,
    );
    let config = Config::from_raw(raw).expect("should validate");
    let (_, handler_cfg) = &config.handlers[0];
    assert!(!handler_cfg.enabled);
}

#[test]
fn extra_fields_pass_through_to_handler_config() {
    let raw = parse(
        r#"
        [handlers.custom]
        event_type = "PreToolUse"
        priority = 10
        pattern = "rm -rf"
        "#,
    );
    let config = Config::from_raw(raw).expect("should validate");
    let (_, handler_cfg) = &config.handlers[0];
    assert_eq!(handler_cfg.extra.get("pattern").and_then(|v| v.as_str()), Some("rm -rf"));
}

#[test]
#[serial]
fn hooks_daemon_input_validation_env_var_disables_validation() {
    std::env::set_var("HOOKS_DAEMON_INPUT_VALIDATION", "false");
    let raw = parse(r#"[validation]
mode = "fail-closed""#);
    let config = Config::from_raw(raw).expect("should validate");
    assert_eq!(config.validation_mode, ValidationMode::Disabled);
    std::env::remove_var("HOOKS_DAEMON_INPUT_VALIDATION");
}

#[test]
#[serial]
fn hooks_daemon_validation_strict_env_var_forces_fail_closed() {
    std::env::set_var("HOOKS_DAEMON_VALIDATION_STRICT", "true");
    let raw = parse(MINIMAL_TEMPLATE);
    let config = Config::from_raw(raw).expect("should validate");
    assert_eq!(config.validation_mode, ValidationMode::FailClosed);
    std::env::remove_var("HOOKS_DAEMON_VALIDATION_STRICT");
}

#[test]
#[serial]
fn invalid_env_override_value_is_a_config_error() {
    std::env::set_var("HOOKS_DAEMON_INPUT_VALIDATION", "maybe");
    let raw = parse(MINIMAL_TEMPLATE);
    let err = Config::from_raw(raw).unwrap_err();
    assert!(err.iter().any(|e| matches!(e, ValidationError::TypeMismatch { field, .. } if field == "HOOKS_DAEMON_INPUT_VALIDATION")));
    std::env::remove_var("HOOKS_DAEMON_INPUT_VALIDATION");
}
