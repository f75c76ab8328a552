// src/errors.rs

//! Crate-wide error type and helpers.

use std::path::PathBuf;

use thiserror::Error;

use crate::exec::CommandError;

/// Coarse classification of a [`MkrunError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A process could not start, be waited for, or be released.
    CommandFailure,
    /// The probe-then-install sequence for a configuration was exhausted.
    ConfigNotFound,
    /// A launcher-level call (such as invoking the build engine) failed.
    CallFailure,
    /// Reading or writing the launcher's own streams failed.
    Io,
    /// Metadata could not be serialized.
    Serialize,
    /// The launcher was asked for something it does not support.
    Usage,
}

#[derive(Error, Debug)]
pub enum MkrunError {
    #[error("command failed")]
    Command(#[from] CommandError),

    #[error("configuration {package}@{version} not found in {}", .dir.display())]
    ConfigNotFound {
        package: String,
        version: String,
        dir: PathBuf,
        #[source]
        source: CommandError,
    },

    #[error("{what} failed")]
    Call {
        what: String,
        #[source]
        source: CommandError,
    },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("serializing metadata")]
    Serialize(#[from] toml::ser::Error),

    #[error("unsupported shell dialect '{0}' (expected bash, zsh or fish)")]
    UnsupportedShell(String),
}

impl MkrunError {
    pub fn call(what: impl Into<String>, source: CommandError) -> Self {
        MkrunError::Call {
            what: what.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MkrunError::Command(_) => ErrorKind::CommandFailure,
            MkrunError::ConfigNotFound { .. } => ErrorKind::ConfigNotFound,
            MkrunError::Call { .. } => ErrorKind::CallFailure,
            MkrunError::Io(_) => ErrorKind::Io,
            MkrunError::Serialize(_) => ErrorKind::Serialize,
            MkrunError::UnsupportedShell(_) => ErrorKind::Usage,
        }
    }

    /// The command failure somewhere in this error's chain, if any.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            MkrunError::Command(source)
            | MkrunError::ConfigNotFound { source, .. }
            | MkrunError::Call { source, .. } => Some(source),
            MkrunError::Io(_) | MkrunError::Serialize(_) | MkrunError::UnsupportedShell(_) => {
                None
            }
        }
    }

    /// Whether this is, at bottom, a failed external command.
    pub fn is_command_failure(&self) -> bool {
        self.command_error().is_some()
    }
}

pub type Result<T> = std::result::Result<T, MkrunError>;
