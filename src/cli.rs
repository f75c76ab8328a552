// src/cli.rs

//! Launcher-level flag recognition.
//!
//! `mkrun` does not own its command line: anything it does not recognise is a
//! build target. Flags may therefore appear anywhere and are picked out one
//! token at a time with [`LauncherFlag::classify`]. `clap` is used for the
//! enumerated values (shell dialects, log levels).

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

pub const TRACE_FLAG: &str = "--trace";
pub const VERSION_FLAG: &str = "--version";
pub const COMPLETION_PREFIX: &str = "--completion=";
pub const CONFIG_PREFIX: &str = "--config=";

/// One classified command-line token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherFlag<'a> {
    /// `--trace`; also forwarded to the build engine.
    Trace,
    /// `--version`.
    Version,
    /// `--completion=<dialect>`, dialect not yet validated.
    Completion(&'a str),
    /// `--config=<value>`, possibly empty.
    Config(&'a str),
    /// Anything else.
    Target(&'a str),
}

impl<'a> LauncherFlag<'a> {
    pub fn classify(token: &'a str) -> Self {
        if token == TRACE_FLAG {
            LauncherFlag::Trace
        } else if token == VERSION_FLAG {
            LauncherFlag::Version
        } else if let Some(dialect) = token.strip_prefix(COMPLETION_PREFIX) {
            LauncherFlag::Completion(dialect)
        } else if let Some(value) = token.strip_prefix(CONFIG_PREFIX) {
            LauncherFlag::Config(value)
        } else {
            LauncherFlag::Target(token)
        }
    }
}

/// Shell dialects completion scripts are shipped for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Case-insensitive lookup of a dialect name.
    pub fn parse(name: &str) -> Option<Shell> {
        <Shell as ValueEnum>::from_str(name, true).ok()
    }
}

/// Log level for diagnostic logging.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse(name: &str) -> Option<LogLevel> {
        match name.trim().to_lowercase().as_str() {
            "warning" => Some(LogLevel::Warn),
            other => <LogLevel as ValueEnum>::from_str(other, true).ok(),
        }
    }

    /// Most verbose diagnostics let through at this level.
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}
