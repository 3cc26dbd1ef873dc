//! Test utilities and mocks for extconf unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use extconf::test_support::{MockProcessOutput, MockRunner};
//!
//! #[test]
//! fn test_example() {
//!     let runner = MockRunner::new();
//!     runner.expect("git rev-parse --short HEAD", MockProcessOutput::success("deadbee"));
//!
//!     let git = GitCli::with_runner("/repo", &runner);
//!     // ...
//! }
//! ```

use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: Vec<u8>,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput::success_bytes(stdout.into().into_bytes())
    }

    /// Create a successful output with raw stdout bytes.
    pub fn success_bytes(stdout: Vec<u8>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout,
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    fn to_output(&self) -> ProcessOutput {
        ProcessOutput {
            code: Some(self.status),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone().into_bytes(),
        }
    }
}

/// Pattern for matching commands in [`MockRunner`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
        }
    }
}

#[derive(Debug)]
struct Expectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
}

/// Mock command runner.
///
/// Commands are matched by their display string (`program arg arg ...`)
/// against expectations in insertion order. A command matching nothing
/// behaves like a program that could not be spawned.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: Mutex<Vec<Expectation>>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Create a mock runner with no expectations.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Add an expectation with an arbitrary pattern.
    pub fn expect_pattern(&self, pattern: CommandPattern, output: MockProcessOutput) -> &Self {
        lock(&self.expectations).push(Expectation { pattern, output });
        self
    }

    /// All commands that were run, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let full_cmd = cmd.display_command();
        lock(&self.calls).push(full_cmd.clone());

        let expectations = lock(&self.expectations);
        match expectations.iter().find(|e| e.pattern.matches(&full_cmd)) {
            Some(exp) => Ok(exp.output.to_output()),
            None => bail!("failed to spawn `{}`: program not found", full_cmd),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_expectation_wins() {
        let runner = MockRunner::new();
        runner
            .expect("git log -1 --pretty=%ci", MockProcessOutput::failure(1, "boom"))
            .expect_prefix("git", MockProcessOutput::success("ok"));

        let out = runner
            .run(&ProcessBuilder::new("git").args(["log", "-1", "--pretty=%ci"]))
            .unwrap();
        assert_eq!(out.code, Some(1));

        let out = runner
            .run(&ProcessBuilder::new("git").arg("status"))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, b"ok");
    }

    #[test]
    fn test_unmatched_command_fails_to_spawn() {
        let runner = MockRunner::new();
        assert!(runner.run(&ProcessBuilder::new("git")).is_err());
        assert_eq!(runner.calls(), vec!["git".to_string()]);
    }
}
