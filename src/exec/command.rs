// src/exec/command.rs

//! A single external command and its `with_*` transformations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backend::Executor;
use super::error::{CommandError, Stage};
use super::io::Endpoint;
use super::mode::Mode;

/// A unit of external execution.
///
/// Every `with_*` method returns an independent copy: the argument and
/// environment vectors are cloned, while the I/O endpoints and the executor
/// are shared. A partially configured command can therefore be used as a
/// template for several calls.
#[derive(Clone)]
pub struct Command {
    args: Vec<String>,
    dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    mode: Mode,
    stdin: Endpoint,
    stdout: Endpoint,
    stderr: Endpoint,
    executor: Option<Arc<dyn Executor>>,
}

impl Command {
    /// A command running `program` with no arguments, attached to the
    /// caller's streams and without an executor.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            args: vec![program.into()],
            dir: None,
            env: Vec::new(),
            mode: Mode::ATTACHED,
            stdin: Endpoint::Inherit,
            stdout: Endpoint::Inherit,
            stderr: Endpoint::Inherit,
            executor: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.args[0]
    }

    /// Program followed by its arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arguments(&self) -> &[String] {
        &self.args[1..]
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Extra environment, applied on top of the inherited one.
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn stdin(&self) -> &Endpoint {
        &self.stdin
    }

    pub fn stdout(&self) -> &Endpoint {
        &self.stdout
    }

    pub fn stderr(&self) -> &Endpoint {
        &self.stderr
    }

    /// Append arguments.
    pub fn with_args<I, S>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cmd = self.clone();
        cmd.args.extend(args.into_iter().map(Into::into));
        cmd
    }

    pub fn with_dir(&self, dir: impl Into<PathBuf>) -> Self {
        let mut cmd = self.clone();
        cmd.dir = Some(dir.into());
        cmd
    }

    /// Append environment assignments. Later assignments win on collision.
    pub fn with_env<I, K, V>(&self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut cmd = self.clone();
        cmd.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        cmd
    }

    pub fn with_mode(&self, mode: Mode) -> Self {
        let mut cmd = self.clone();
        cmd.mode = mode;
        cmd
    }

    pub fn with_stdin(&self, endpoint: Endpoint) -> Self {
        let mut cmd = self.clone();
        cmd.stdin = endpoint;
        cmd
    }

    pub fn with_stdout(&self, endpoint: Endpoint) -> Self {
        let mut cmd = self.clone();
        cmd.stdout = endpoint;
        cmd
    }

    pub fn with_stderr(&self, endpoint: Endpoint) -> Self {
        let mut cmd = self.clone();
        cmd.stderr = endpoint;
        cmd
    }

    pub fn with_executor(&self, executor: Arc<dyn Executor>) -> Self {
        let mut cmd = self.clone();
        cmd.executor = Some(executor);
        cmd
    }

    /// Run through the attached executor using the command's own mode.
    pub async fn run(&self) -> Result<(), CommandError> {
        match &self.executor {
            Some(executor) => executor.execute(self.mode, self).await,
            None => Err(CommandError::new(
                self,
                Stage::Preparing,
                "no executor configured for command",
            )),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("args", &self.args)
            .field("dir", &self.dir)
            .field("env", &self.env)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Shell-ish rendering used in diagnostics: `[dir] K=V program args...`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.dir {
            write!(f, "[{}] ", dir.display())?;
        }
        for (key, value) in &self.env {
            write!(f, "{key}={} ", quote(value))?;
        }
        let rendered: Vec<String> = self.args.iter().map(|a| quote(a)).collect();
        f.write_str(&rendered.join(" "))
    }
}

fn quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@,+%".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
