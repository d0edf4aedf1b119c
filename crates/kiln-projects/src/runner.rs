//! Synchronous shell command execution
//!
//! Every external tool (pip, git, pre-commit) goes through a [`CommandRunner`]
//! so that steps can be exercised without touching the host. [`ShellRunner`]
//! runs commands for real, [`RecordingRunner`] records them and replays canned
//! output for dry runs and tests.

use crate::error::{Error, Result};
use camino::Utf8Path;
use std::borrow::Cow;
use std::cell::RefCell;
use std::process::Command;
use tracing::debug;

/// Executes a shell command and returns its captured stdout
pub trait CommandRunner {
    /// Run `command` through the shell in `dir`, blocking until it exits.
    ///
    /// # Errors
    /// Returns [`Error::CommandFailure`] carrying the command, exit code and
    /// captured stderr when the command exits non-zero.
    fn run(&self, command: &str, dir: &Utf8Path) -> Result<String>;
}

/// Quote a single argument for interpolation into a shell command
pub fn quote(arg: &str) -> Cow<'_, str> {
    shell_words::quote(arg)
}

/// Runs commands through `sh -c`
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, dir: &Utf8Path) -> Result<String> {
        debug!("Running command: {} in {}", command, dir);

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(dir)
            .output()
            .map_err(|source| Error::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::command_failure(
                command,
                output.status.code(),
                stderr.trim(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !stdout.is_empty() {
            debug!("Command output: {}", stdout.trim());
        }

        Ok(stdout)
    }
}

/// Canned result for commands starting with a given prefix
#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    Failure { code: i32, stderr: String },
}

/// Records commands instead of running them.
///
/// Commands succeed with empty output unless a reply was registered for a
/// matching prefix; the most recently registered matching reply wins.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<String>>,
    replies: Vec<(String, Reply)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `stdout` to commands starting with `prefix`
    pub fn with_output(mut self, prefix: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.replies
            .push((prefix.into(), Reply::Output(stdout.into())));
        self
    }

    /// Fail commands starting with `prefix`
    pub fn with_failure(
        mut self,
        prefix: impl Into<String>,
        code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        self.replies.push((
            prefix.into(),
            Reply::Failure {
                code,
                stderr: stderr.into(),
            },
        ));
        self
    }

    /// Commands run so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    /// Whether any recorded command starts with `prefix`
    pub fn ran(&self, prefix: &str) -> bool {
        self.commands.borrow().iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, dir: &Utf8Path) -> Result<String> {
        debug!("[dry-run] {} (in {})", command, dir);
        self.commands.borrow_mut().push(command.to_string());

        let reply = self
            .replies
            .iter()
            .rev()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply);

        match reply {
            Some(Reply::Output(stdout)) => Ok(stdout.clone()),
            Some(Reply::Failure { code, stderr }) => {
                Err(Error::command_failure(command, Some(*code), stderr.clone()))
            }
            None => Ok(String::new()),
        }
    }
}
