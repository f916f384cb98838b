use super::*;
use serial_test::serial;

#[test]
fn project_hash_is_deterministic() {
    let root = Path::new("/home/user/project-a");
    assert_eq!(project_hash(root), project_hash(root));
}

#[test]
fn project_hash_is_eight_hex_chars() {
    let hash = project_hash(Path::new("/home/user/project-a"));
    assert_eq!(hash.len(), 8);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn project_hash_differs_across_distinct_roots() {
    let a = project_hash(Path::new("/home/user/project-a"));
    let b = project_hash(Path::new("/home/user/project-b"));
    assert_ne!(a, b);
}

#[test]
#[serial]
fn socket_path_respects_runtime_dir_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    // SAFETY: test-only, single-threaded access to this process's env.
    std::env::set_var("CLAUDE_HOOKS_RUNTIME_DIR", dir.path());
    let root = Path::new("/home/user/project-a");
    let path = socket_path(root).expect("socket path should resolve");
    assert!(path.starts_with(dir.path()));
    assert!(path.to_string_lossy().ends_with(".sock"));
    std::env::remove_var("CLAUDE_HOOKS_RUNTIME_DIR");
}

#[test]
#[serial]
fn socket_path_rejects_overlong_runtime_dir() {
    let long_dir = PathBuf::from("/tmp").join("x".repeat(120));
    std::env::set_var("CLAUDE_HOOKS_RUNTIME_DIR", &long_dir);
    let root = Path::new("/home/user/project-a");
    let err = socket_path(root).unwrap_err();
    assert!(matches!(err, IdentityError::PathTooLong(_, _)));
    std::env::remove_var("CLAUDE_HOOKS_RUNTIME_DIR");
}

/// Scenario 4 from spec.md §8: two distinct projects get distinct sockets,
/// both matching `claude-hooks-<basename>-<hash8>.sock` and differing only
/// in the hash suffix.
#[test]
#[serial]
fn distinct_projects_get_distinct_sockets_matching_the_naming_scheme() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::env::set_var("CLAUDE_HOOKS_RUNTIME_DIR", dir.path());

    let a = socket_path(Path::new("/home/a/proj-x")).expect("socket path");
    let b = socket_path(Path::new("/home/a/proj-y")).expect("socket path");

    let re = regex_lite_matches(&a, "proj-x") && regex_lite_matches(&b, "proj-y");
    assert!(re, "expected both paths to match the claude-hooks-<basename>-<hash8>.sock scheme: {a:?} {b:?}");
    assert_ne!(a, b);

    std::env::remove_var("CLAUDE_HOOKS_RUNTIME_DIR");
}

fn regex_lite_matches(path: &Path, basename: &str) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let prefix = format!("claude-hooks-{basename}-");
    name.starts_with(&prefix)
        && name.ends_with(".sock")
        && name.len() == prefix.len() + 8 + ".sock".len()
        && name[prefix.len()..prefix.len() + 8].chars().all(|c| c.is_ascii_hexdigit())
}

#[test]
fn pid_path_shares_the_socket_path_stem() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::env::set_var("CLAUDE_HOOKS_RUNTIME_DIR", dir.path());

    let root = Path::new("/home/user/project-a");
    let sock = socket_path(root).expect("socket path");
    let pid = pid_path(root).expect("pid path");

    assert_eq!(sock.parent(), pid.parent());
    assert_eq!(sock.file_stem(), pid.file_stem());

    std::env::remove_var("CLAUDE_HOOKS_RUNTIME_DIR");
}

#[test]
fn sanitize_basename_collapses_unsafe_characters() {
    assert_eq!(sanitize_basename(Path::new("/home/user/My Cool Repo!")), "my_cool_repo_");
}

#[test]
#[serial]
fn falls_back_to_a_shorter_runtime_dir_when_the_preferred_one_is_too_long() {
    let long_xdg = PathBuf::from("/tmp").join("y".repeat(110));
    std::env::remove_var("CLAUDE_HOOKS_RUNTIME_DIR");
    std::env::remove_var("TMPDIR");
    std::env::set_var("XDG_RUNTIME_DIR", &long_xdg);

    let root = Path::new("/home/user/project-a");
    assert!(uses_fallback_runtime_dir(root).expect("should find a fallback candidate"));

    let sock = socket_path(root).expect("socket path should resolve via fallback");
    assert!(!sock.starts_with(&long_xdg));

    std::env::remove_var("XDG_RUNTIME_DIR");
}

#[test]
#[serial]
fn default_runtime_dir_does_not_report_as_a_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::env::set_var("CLAUDE_HOOKS_RUNTIME_DIR", dir.path());
    let root = Path::new("/home/user/project-a");
    assert!(!uses_fallback_runtime_dir(root).expect("should resolve"));
    std::env::remove_var("CLAUDE_HOOKS_RUNTIME_DIR");
}

#[test]
fn canonical_project_root_rejects_missing_path() {
    let err = canonical_project_root(Path::new("/does/not/exist/hopefully")).unwrap_err();
    assert!(matches!(err, IdentityError::ProjectNotFound(_)));
}
