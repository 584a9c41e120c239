//! Running the `git` executable.
//!
//! ```text
//! GitRunner::run(dir, args)
//!   git -C <dir> <args>   stdin=null, GIT_TERMINAL_PROMPT=0
//!        |
//!   timeout? -> child dropped (kill_on_drop) -> Error::Timeout
//!        |
//!   GitOutput { code, stdout, stderr }
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::{Error, Result};

/// Default per-invocation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Captured result of one git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Non-empty stdout lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().filter(|line| !line.trim().is_empty())
    }
}

/// Spawns git with a fixed binary and timeout.
#[derive(Debug, Clone)]
pub struct GitRunner {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("git"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GitRunner {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run git in `dir` and return its output whatever the exit status.
    ///
    /// Only spawn failures and timeouts are errors.
    pub async fn output(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        let joined = args.join(" ");
        tracing::debug!(dir = %dir.display(), args = %joined, "exec git");

        let child = Command::new(&self.binary)
            .arg("-C")
            .arg(dir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| Error::Io {
                path: dir.to_path_buf(),
                source,
            })?,
            Err(_) => {
                tracing::debug!(dir = %dir.display(), args = %joined, "git timed out");
                return Err(Error::Timeout {
                    args: joined,
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        Ok(GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Run git in `dir`, failing on a non-zero exit.
    pub async fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        let output = self.output(dir, args).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::CommandFailed {
                args: args.join(" "),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }

    /// Run a query whose failure only means "no answer".
    ///
    /// Failures are logged at debug level and yield `None`.
    pub async fn query(&self, dir: &Path, args: &[&str]) -> Option<GitOutput> {
        match self.run(dir, args).await {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "git query failed");
                None
            }
        }
    }
}
