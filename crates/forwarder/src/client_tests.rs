use super::*;
use serial_test::serial;

#[test]
#[serial]
fn find_project_root_honors_the_override_env_var() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("CLAUDE_HOOKS_PROJECT_ROOT", dir.path());
    let found = find_project_root().unwrap();
    std::env::remove_var("CLAUDE_HOOKS_PROJECT_ROOT");
    assert_eq!(found, dir.path());
}

#[test]
fn project_paths_resolve_fails_for_a_missing_root() {
    let err = ProjectPaths::resolve(Path::new("/does/not/exist/anywhere")).unwrap_err();
    assert!(matches!(err, ClientError::NoProjectRoot));
}

#[tokio::test]
async fn connect_or_start_fails_closed_when_the_daemon_binary_cannot_be_found() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ProjectPaths::resolve(dir.path()).unwrap();

    std::env::set_var("HOOKS_DAEMON_BINARY", "/no/such/hooksd/binary");
    std::env::set_var("HOOKS_TIMEOUT_START_MS", "200");
    std::env::set_var("HOOKS_POLL_INTERVAL_MS", "10");

    let result = connect_or_start(&paths).await;

    std::env::remove_var("HOOKS_DAEMON_BINARY");
    std::env::remove_var("HOOKS_TIMEOUT_START_MS");
    std::env::remove_var("HOOKS_POLL_INTERVAL_MS");

    assert!(matches!(result, Err(ClientError::DaemonStartFailed(_))));
}
