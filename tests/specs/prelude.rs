//! Shared helpers for black-box CLI specs
//!
//! Every spec runs the real `shift` binary against a throwaway state
//! directory and a service address nothing listens on.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Address with no listener; any network call fails fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// Run `shift` with no state directory prepared.
pub fn cli() -> CliBuilder {
    CliBuilder::new(None)
}

/// An isolated state directory for one spec.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the state directory.
    pub fn file(&self, rel: &str, contents: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(rel)).unwrap()
    }

    /// Seed the persisted cursor as a previous run would have left it.
    pub fn cursor(&self, job_id: &str, last_seq: u64) {
        let doc = serde_json::json!({
            "v": 1,
            "updated_at": "2026-01-01T00:00:00Z",
            "entries": {
                "autoshift.installer.jobId": job_id,
                "autoshift.installer.lastSeq": last_seq.to_string(),
            }
        });
        self.file("cursor.json", &doc.to_string());
    }

    pub fn shift(&self) -> CliBuilder {
        CliBuilder::new(Some(self.dir.path().to_path_buf()))
    }
}

pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    state_dir: PathBuf,
    // Keeps the fallback state directory alive for `cli()` runs
    _scratch: Option<TempDir>,
}

impl CliBuilder {
    fn new(state_dir: Option<PathBuf>) -> Self {
        let (state_dir, scratch) = match state_dir {
            Some(dir) => (dir, None),
            None => {
                let scratch = TempDir::new().unwrap();
                (scratch.path().to_path_buf(), Some(scratch))
            }
        };
        Self { args: Vec::new(), envs: Vec::new(), state_dir, _scratch: scratch }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn run(self) -> RunAssert {
        let mut cmd = Command::cargo_bin("shift").unwrap();
        cmd.args(&self.args)
            .env("SHIFT_STATE_DIR", &self.state_dir)
            .env("SHIFT_API_URL", UNREACHABLE_API)
            .env("NO_COLOR", "1")
            .env_remove("SHIFT_TOKEN")
            .env_remove("SHIFT_LOG")
            .timeout(std::time::Duration::from_secs(30));
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        let output = cmd.output().unwrap();
        RunAssert {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Run and assert exit code 0.
    pub fn passes(self) -> RunAssert {
        let run = self.run();
        assert_eq!(
            run.code,
            Some(0),
            "expected success\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }

    /// Run and assert a non-zero exit.
    pub fn fails(self) -> RunAssert {
        let run = self.run();
        assert_ne!(
            run.code,
            Some(0),
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }
}

pub struct RunAssert {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl RunAssert {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly has {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.code, Some(expected), "stderr:\n{}", self.stderr);
        self
    }
}
