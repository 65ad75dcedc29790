//! Shared test utilities for mathplan CLI tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing context that provides isolated working and home directories.
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    home: PathBuf,
}

impl TestContext {
    /// Create a new isolated test context.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        let home = root.path().join("home");
        fs::create_dir_all(&home).expect("Failed to create test home directory");

        Self { root, work_dir, home }
    }

    /// Path to the directory used as the CLI working directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path to the isolated HOME directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Build a command for invoking the compiled binary within the test context.
    ///
    /// The API key and log filter inherited from the developer's shell are
    /// removed so results do not depend on the host environment.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("mathplan").expect("Failed to locate mathplan binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env_remove("OPENAI_API_KEY")
            .env_remove("MATHPLAN_LOG");
        cmd
    }

    /// Same as [`TestContext::cli`] with an API key in the environment.
    pub fn cli_with_key(&self) -> Command {
        let mut cmd = self.cli();
        cmd.env("OPENAI_API_KEY", "sk-test");
        cmd
    }

    /// Write `content` to `name` inside the work directory.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write a `mathplan.toml` pointing the completion client at `api_url`.
    pub fn write_config(&self, api_url: &str) -> PathBuf {
        self.write_file(
            "mathplan.toml",
            &format!(
                "[completion]\napi_url = \"{}\"\ntimeout_secs = 5\n\
                 max_retries = 1\nretry_delay_ms = 1\n",
                api_url
            ),
        )
    }

    /// Read a file relative to the work directory.
    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.work_dir.join(name)).expect("Failed to read test file")
    }
}
