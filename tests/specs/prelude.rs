use std::path::Path;

use assert_cmd::assert::Assert;
use assert_cmd::Command;

/// A throwaway project directory with its own `.claude` config and its own
/// daemon identity (project hash, socket, pid file) derived from its path.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn hooksctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("hooksctl").expect("hooksctl binary should be built");
        cmd.arg("--project").arg(self.path());
        cmd
    }

    pub fn hook_forward(&self, event_type: &str) -> Command {
        let mut cmd = Command::cargo_bin("hook-forward").expect("hook-forward binary should be built");
        cmd.arg(event_type);
        cmd.env("CLAUDE_HOOKS_PROJECT_ROOT", self.path());
        cmd
    }

    pub fn write_config(&self, contents: &str) {
        let claude_dir = self.path().join(".claude");
        std::fs::create_dir_all(&claude_dir).expect("mkdir .claude");
        std::fs::write(claude_dir.join("hooks-daemon.toml"), contents).expect("write config");
    }
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}
