//! Source-control backends queried for the version stamp.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::process::{CommandRunner, ProcessBuilder, SystemRunner};

/// Failure to obtain an answer from the source-control tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("could not run `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("`{command}` exited with status {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` produced output that is not valid UTF-8")]
    InvalidUtf8 { command: String },
}

/// The two read-only questions the version stamp needs answered.
pub trait SourceControl {
    /// Short identifier of the current HEAD commit.
    fn short_commit_id(&self) -> Result<String, QueryError>;

    /// Committer date of the latest commit, `YYYY-MM-DD HH:MM:SS +ZZZZ`.
    fn commit_timestamp(&self) -> Result<String, QueryError>;
}

impl<S: SourceControl + ?Sized> SourceControl for &S {
    fn short_commit_id(&self) -> Result<String, QueryError> {
        (**self).short_commit_id()
    }

    fn commit_timestamp(&self) -> Result<String, QueryError> {
        (**self).commit_timestamp()
    }
}

/// Backend that shells out to the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli<R = SystemRunner> {
    git: PathBuf,
    repo: PathBuf,
    runner: R,
}

impl GitCli {
    /// Query the repository containing `repo` with the `git` found on PATH.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        GitCli::with_runner(repo, SystemRunner)
    }
}

impl<R: CommandRunner> GitCli<R> {
    /// Query `repo` through a custom command runner.
    pub fn with_runner(repo: impl Into<PathBuf>, runner: R) -> Self {
        GitCli {
            git: PathBuf::from("git"),
            repo: repo.into(),
            runner,
        }
    }

    /// Use a specific git executable instead of the one on PATH.
    pub fn git_program(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = git.into();
        self
    }

    /// Run `git <args>` and return trimmed stdout.
    fn query(&self, args: &[&str]) -> Result<String, QueryError> {
        let cmd = ProcessBuilder::new(&self.git).args(args).cwd(&self.repo);
        let command = cmd.display_command();

        tracing::debug!("Running `{}` in {}", command, self.repo.display());

        let output = self.runner.run(&cmd).map_err(|e| QueryError::Spawn {
            command: command.clone(),
            message: format!("{:#}", e),
        })?;

        if !output.success() {
            return Err(QueryError::NonZeroExit {
                command,
                code: output.code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|_| QueryError::InvalidUtf8 { command })?;

        Ok(stdout.trim().to_string())
    }
}

impl<R: CommandRunner> SourceControl for GitCli<R> {
    fn short_commit_id(&self) -> Result<String, QueryError> {
        self.query(&["rev-parse", "--short", "HEAD"])
    }

    fn commit_timestamp(&self) -> Result<String, QueryError> {
        self.query(&["log", "-1", "--pretty=%ci"])
    }
}
