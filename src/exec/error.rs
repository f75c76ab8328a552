// src/exec/error.rs

//! Errors produced while supervising a single external command.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

use super::command::Command;

/// Boxed cause carried by a [`CommandError`].
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Where in the process lifecycle a command failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The command could not be handed to an executor at all.
    Preparing,
    /// The null device needed for detached I/O could not be opened.
    OpeningNullDevice,
    /// The OS refused to spawn the process.
    Starting,
    /// Waiting for the process failed, or it exited unsuccessfully.
    Waiting,
    /// A background process could not be released.
    Releasing,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Preparing => "preparing process",
            Stage::OpeningNullDevice => "opening null device",
            Stage::Starting => "starting process",
            Stage::Waiting => "waiting for process",
            Stage::Releasing => "releasing process",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A command that ran to completion but did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub struct ExitFailure {
    code: Option<i32>,
}

impl ExitFailure {
    pub fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Exit code, or `None` if the process was terminated by a signal.
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for ExitFailure {
    fn from(status: ExitStatus) -> Self {
        Self::new(status.code())
    }
}

impl fmt::Display for ExitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Failure of one external command.
///
/// Carries a snapshot of the command's argument vector, directory and
/// extra environment. I/O endpoints are deliberately not captured.
#[derive(Debug, Error)]
#[error("{stage} `{}`", .args.join(" "))]
pub struct CommandError {
    args: Vec<String>,
    dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    stage: Stage,
    #[source]
    source: Cause,
}

impl CommandError {
    pub fn new(command: &Command, stage: Stage, source: impl Into<Cause>) -> Self {
        Self {
            args: command.args().to_vec(),
            dir: command.dir().map(Path::to_path_buf),
            env: command.env().to_vec(),
            stage,
            source: source.into(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Exit code of a process that ran but failed, if that is what happened.
    pub fn exit_code(&self) -> Option<i32> {
        self.source
            .downcast_ref::<ExitFailure>()
            .and_then(ExitFailure::code)
    }

    /// True when the process started and then exited unsuccessfully.
    pub fn is_exit_failure(&self) -> bool {
        self.source.is::<ExitFailure>()
    }
}
