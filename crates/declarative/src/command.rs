//! Command executor seam
//!
//! Providers only build command lines. Running them is delegated to a
//! [`CommandExecutor`], which blocks until the command finishes and hands
//! back its captured output.

use crate::error::{Error, Result};
use std::process::{Command, Output};

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` if the process was killed by a signal
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            stderr: String::new(),
            code: Some(0),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.to_string(),
            code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }
}

/// Runs command lines on behalf of providers
///
/// Only a failure to launch is an error; a non-zero exit status is part
/// of the returned output and left for the caller to interpret.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &str) -> Result<CommandOutput>;
}

/// Executor that runs command lines through `sh -c`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("executing: {command}");
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .map(CommandOutput::from)
            .map_err(|source| Error::CommandLaunch {
                command: command.to_string(),
                source,
            })
    }
}
