// src/exec/traced.rs

//! Executor decorator that reports every call to the event log.

use std::sync::Arc;

use super::backend::{ExecFuture, Executor};
use super::command::Command;
use super::mode::Mode;
use crate::logging::EventLogger;

/// Logs an `exec` event for each command, then delegates.
#[derive(Debug, Clone)]
pub struct TracingExecutor {
    inner: Arc<dyn Executor>,
    log: EventLogger,
}

impl TracingExecutor {
    pub fn new(inner: Arc<dyn Executor>, log: EventLogger) -> Self {
        Self { inner, log }
    }
}

impl Executor for TracingExecutor {
    fn execute<'a>(&'a self, mode: Mode, command: &'a Command) -> ExecFuture<'a> {
        self.log.exec(mode, command);
        self.inner.execute(mode, command)
    }
}
