// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! Everything that touches OS processes goes through an [`Executor`]:
//!
//! - [`SystemExecutor`] is the production implementation, built on
//!   `tokio::process`.
//! - Tests provide their own implementation that records commands and
//!   answers them without spawning anything.

use std::fmt::Debug;
use std::future::Future;
use std::io;
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command as NativeCommand;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::command::Command;
use super::error::{CommandError, ExitFailure, Stage};
use super::io::{Endpoint, open_null_device};
use super::mode::Mode;

/// Boxed future returned by [`Executor::execute`].
pub type ExecFuture<'a> = Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send + 'a>>;

/// Runs one command under a supervision mode.
pub trait Executor: Send + Sync + Debug {
    /// Execute `command` with `mode`.
    ///
    /// Attached and detached commands resolve once the child has exited.
    /// Background commands resolve as soon as the child has been started
    /// and released.
    fn execute<'a>(&'a self, mode: Mode, command: &'a Command) -> ExecFuture<'a>;
}

/// Executor spawning real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SystemExecutor {
    fn execute<'a>(&'a self, mode: Mode, command: &'a Command) -> ExecFuture<'a> {
        Box::pin(run_native(mode, command))
    }
}

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

async fn run_native(mode: Mode, command: &Command) -> Result<(), CommandError> {
    let mut native = NativeCommand::new(command.program());
    native.args(command.arguments());
    if let Some(dir) = command.dir() {
        native.current_dir(dir);
    }
    // Inherited environment plus ours; `envs` applies in order so later wins.
    native.envs(command.env().iter().map(|(k, v)| (k.as_str(), v.as_str())));

    wire_stdio(&mut native, mode, command)?;

    if mode.is_background() {
        #[cfg(unix)]
        native.process_group(0);
        #[cfg(windows)]
        native.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
    }

    debug!(%mode, cmd = %command, "starting process");

    let mut child = native
        .spawn()
        .map_err(|e| CommandError::new(command, Stage::Starting, e))?;

    if mode.is_background() {
        let pid = child.id().ok_or_else(|| {
            CommandError::new(
                command,
                Stage::Releasing,
                io::Error::other("child handle no longer refers to a running process"),
            )
        })?;
        // Dropping the handle without kill_on_drop leaves the child running;
        // the runtime reaps it if it exits while we are still alive.
        drop(child);
        debug!(pid, cmd = %command, "released background process");
        return Ok(());
    }

    let feeder = match (command.stdin(), child.stdin.take()) {
        (Endpoint::Buffer(buffer), Some(mut pipe)) if !mode.is_detached() => {
            let data = buffer.contents();
            Some(tokio::spawn(async move {
                match pipe.write_all(&data).await {
                    Ok(()) => pipe.shutdown().await,
                    // The child exited or closed stdin without reading it all.
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    Err(e) => Err(e),
                }
            }))
        }
        _ => None,
    };
    let out_pump = drain(child.stdout.take(), command.stdout(), mode);
    let err_pump = drain(child.stderr.take(), command.stderr(), mode);

    let status = child
        .wait()
        .await
        .map_err(|e| CommandError::new(command, Stage::Waiting, e))?;

    for pump in [feeder, out_pump, err_pump].into_iter().flatten() {
        match pump.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(CommandError::new(command, Stage::Waiting, e)),
            Err(join) => {
                return Err(CommandError::new(
                    command,
                    Stage::Waiting,
                    io::Error::other(join),
                ));
            }
        }
    }

    trace!(cmd = %command, code = ?status.code(), "process exited");

    if status.success() {
        Ok(())
    } else {
        Err(CommandError::new(
            command,
            Stage::Waiting,
            ExitFailure::from(status),
        ))
    }
}

fn wire_stdio(native: &mut NativeCommand, mode: Mode, command: &Command) -> Result<(), CommandError> {
    if mode.is_detached() {
        let null = open_null_device()
            .map_err(|e| CommandError::new(command, Stage::OpeningNullDevice, e))?;
        let clone = |f: &std::fs::File| {
            f.try_clone()
                .map_err(|e| CommandError::new(command, Stage::OpeningNullDevice, e))
        };
        native.stdin(clone(&null)?);
        native.stdout(clone(&null)?);
        native.stderr(null);
        return Ok(());
    }

    // A released background child has no reader left for its pipes, and
    // must not read from the caller's terminal outside its process group.
    let endpoint = |e: &Endpoint| -> Endpoint {
        if mode.is_background() && e.is_buffer() {
            Endpoint::Null
        } else {
            e.clone()
        }
    };
    let to_stdio = |e: Endpoint| {
        e.to_stdio()
            .map_err(|err| CommandError::new(command, Stage::Starting, err))
    };

    let stdin = if mode.is_background() {
        Endpoint::Null
    } else {
        command.stdin().clone()
    };
    native.stdin(to_stdio(stdin)?);
    native.stdout(to_stdio(endpoint(command.stdout()))?);
    native.stderr(to_stdio(endpoint(command.stderr()))?);
    Ok(())
}

/// Copy a child's output pipe into the endpoint's buffer.
fn drain<R>(pipe: Option<R>, endpoint: &Endpoint, mode: Mode) -> Option<JoinHandle<io::Result<()>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    match (endpoint, pipe) {
        (Endpoint::Buffer(buffer), Some(mut pipe)) if !mode.is_detached() => {
            let buffer = buffer.clone();
            Some(tokio::spawn(async move {
                let mut data = Vec::new();
                pipe.read_to_end(&mut data).await?;
                buffer.append(&data);
                Ok(())
            }))
        }
        _ => None,
    }
}
