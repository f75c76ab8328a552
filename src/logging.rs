// src/logging.rs

//! Logging for `mkrun`.
//!
//! Two separate channels:
//!
//! - Diagnostic logging through `tracing` + `tracing-subscriber`, level taken
//!   from `MKRUN_LOG` (default `warn`), written to STDERR.
//! - The user-facing [`EventLogger`]: `call`, `metadata`, `exec`, `error`
//!   and free-form message lines written to the launcher's own error stream.
//!   This is what `--trace` turns on and what failures always print.

use std::error::Error as StdError;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;
use crate::exec::{Command, Mode, StdStreams};
use crate::metadata::Metadata;

/// Install the diagnostic subscriber. Fails if one is already installed.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let max_level = level.map_or(LevelFilter::WARN, LogLevel::filter);

    // stdout belongs to the build engine.
    fmt()
        .with_writer(std::io::stderr)
        .with_max_level(max_level)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing diagnostic subscriber: {e}"))
}

/// Writes launcher events to an error stream, one line each.
#[derive(Debug, Clone)]
pub struct EventLogger {
    streams: StdStreams,
    prefix: String,
}

impl EventLogger {
    pub fn new(streams: StdStreams, prefix: impl Into<String>) -> Self {
        Self {
            streams,
            prefix: prefix.into(),
        }
    }

    /// The launcher's own invocation.
    pub fn call(&self, argv: &[String]) {
        self.emit("call", &argv.join(" "));
    }

    pub fn metadata(&self, metadata: &Metadata) {
        self.emit("metadata", &metadata.to_string());
    }

    /// An external command about to run.
    pub fn exec(&self, mode: Mode, command: &Command) {
        if mode.is_attached() {
            self.emit("exec", &command.to_string());
        } else {
            self.emit("exec", &format!("{command} ({mode})"));
        }
    }

    /// An error and its whole cause chain, joined by `": "`.
    pub fn error(&self, err: &(dyn StdError + 'static)) {
        self.emit("error", &error_chain(err));
    }

    pub fn message(&self, text: &str) {
        self.emit("message", text);
    }

    fn emit(&self, event: &str, text: &str) {
        tracing::debug!(event, "{text}");
        let line = format!("{}: {event}: {text}\n", self.prefix);
        if let Err(e) = self.streams.write_err(line.as_bytes()) {
            tracing::warn!(error = %e, "failed to write event log line");
        }
    }
}

/// Render `err` followed by each of its sources.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
