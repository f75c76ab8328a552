// src/lib.rs

pub mod cli;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod launcher;
pub mod logging;
pub mod metadata;
pub mod signal;

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::Settings;
use crate::exec::{StdStreams, SystemExecutor};
use crate::launcher::{ExitCode, Launcher};
use crate::metadata::Metadata;
use crate::signal::{Signal, SignalMonitor};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the real process executor and the process's own streams
/// - the launcher pipeline (flags, configuration, dispatch, build engine)
/// - SIGINT / SIGTERM handling
pub async fn run(settings: Settings, args: Vec<String>) -> ExitCode {
    let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let launcher = Launcher::new(
        Metadata::current(),
        Arc::new(SystemExecutor::new()),
        settings,
        StdStreams::inherit(),
        work_dir,
    );

    run_with(&launcher, &CancellationToken::new(), &args).await
}

/// Run `launcher` until it finishes, SIGINT / SIGTERM arrives, or `parent`
/// is cancelled. The last two give [`ExitCode::Interrupted`].
pub async fn run_with(
    launcher: &Launcher,
    parent: &CancellationToken,
    args: &[String],
) -> ExitCode {
    let monitor = SignalMonitor::new(
        |token, signal| {
            warn!(%signal, "received signal; abandoning run");
            token.cancel();
        },
        [Signal::Interrupt, Signal::Terminate],
    );
    let token = monitor.arm(parent);

    let code = tokio::select! {
        code = launcher.run(args) => code,
        _ = token.cancelled() => ExitCode::Interrupted,
    };

    // Stops the signal listener if no signal arrived.
    token.cancel();
    code
}
