// src/launcher.rs

//! The orchestrator: scan launcher flags, resolve configuration, dispatch
//! targets, run the build engine and map the outcome to an exit code.
//!
//! A [`Launcher`] holds only the inputs fixed at startup. Everything decided
//! during one invocation (scanned flags, repository root, [`Resolution`],
//! [`Dispatch`]) is a value passed from one step to the next.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cli::{LauncherFlag, Shell};
use crate::completion;
use crate::config::{Resolution, Resolver, Settings};
use crate::dispatch::{Dispatch, dispatch};
use crate::errors::{MkrunError, Result};
use crate::exec::{
    Command, Endpoint, Executor, SharedBuffer, Stage, StdStreams, TracingExecutor,
};
use crate::logging::EventLogger;
use crate::metadata::Metadata;

/// Name the launcher reports itself as.
pub const PROGRAM: &str = "mkrun";

pub const ENV_ROOT: &str = "MKRUN_ROOT";
pub const ENV_CONFIG_DIR: &str = "MKRUN_CONFIG_DIR";
pub const ENV_CONFIG_VERSION: &str = "MKRUN_CONFIG_VERSION";

/// Process exit codes. The numeric values are a stable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    /// The launcher itself could not do what was asked.
    Failure = 1,
    /// Configuration could not be resolved.
    Config = 2,
    /// The build engine failed.
    Target = 3,
    /// A termination signal arrived.
    Interrupted = 130,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Flags and targets collected from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Scan {
    targets: Vec<String>,
    config_override: Option<String>,
    trace: bool,
    early_exit: Option<EarlyExit>,
}

/// A request answered without touching configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EarlyExit {
    Version,
    Completion(String),
}

struct Failure {
    code: ExitCode,
    error: MkrunError,
}

impl Failure {
    fn new(code: ExitCode, error: impl Into<MkrunError>) -> Self {
        Self {
            code,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Launcher {
    metadata: Metadata,
    executor: Arc<dyn Executor>,
    settings: Settings,
    streams: StdStreams,
    work_dir: PathBuf,
    extra_env: Vec<(String, String)>,
}

impl Launcher {
    pub fn new(
        metadata: Metadata,
        executor: Arc<dyn Executor>,
        settings: Settings,
        streams: StdStreams,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            metadata,
            executor,
            settings,
            streams,
            work_dir: work_dir.into(),
            extra_env: Vec::new(),
        }
    }

    /// Extra environment handed to the build engine.
    pub fn with_extra_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Run one invocation with the given arguments (program name excluded).
    pub async fn run(&self, args: &[String]) -> ExitCode {
        let log = EventLogger::new(self.streams.clone(), PROGRAM);
        let argv: Vec<String> = std::iter::once(PROGRAM.to_string())
            .chain(args.iter().cloned())
            .collect();

        let scan = self.scan(args, &argv, &log);
        let outcome = match &scan.early_exit {
            Some(EarlyExit::Version) => self.print_version(),
            Some(EarlyExit::Completion(dialect)) => self.print_completion(dialect),
            None => self.drive(&scan, &log).await,
        };
        self.finish(outcome, scan.trace, &argv, &log)
    }

    /// Walk the tokens left to right. `--version` and `--completion=` stop
    /// the scan where they stand.
    fn scan(&self, args: &[String], argv: &[String], log: &EventLogger) -> Scan {
        let mut scan = Scan {
            config_override: self.settings.config_override.clone(),
            ..Scan::default()
        };

        for token in args {
            match LauncherFlag::classify(token) {
                LauncherFlag::Trace => {
                    if !scan.trace {
                        log.call(argv);
                        log.metadata(&self.metadata);
                    }
                    scan.trace = true;
                    scan.targets.push(token.clone());
                }
                LauncherFlag::Version => {
                    scan.early_exit = Some(EarlyExit::Version);
                    break;
                }
                LauncherFlag::Completion(dialect) => {
                    scan.early_exit = Some(EarlyExit::Completion(dialect.to_string()));
                    break;
                }
                LauncherFlag::Config(value) => scan.config_override = Some(value.to_string()),
                LauncherFlag::Target(target) => scan.targets.push(target.to_string()),
            }
        }

        debug!(?scan, "scanned command line");
        scan
    }

    fn finish(
        &self,
        outcome: std::result::Result<(), Failure>,
        traced: bool,
        argv: &[String],
        log: &EventLogger,
    ) -> ExitCode {
        match outcome {
            Ok(()) => ExitCode::Success,
            Err(failure) => {
                if !traced {
                    log.call(argv);
                    log.metadata(&self.metadata);
                }
                log.error(&failure.error);
                failure.code
            }
        }
    }

    fn print_version(&self) -> std::result::Result<(), Failure> {
        let write = || -> Result<()> {
            let rendered = self.metadata.to_toml()?;
            self.streams.write_out(rendered.as_bytes())?;
            Ok(())
        };
        write().map_err(|e| Failure::new(ExitCode::Failure, e))
    }

    fn print_completion(&self, dialect: &str) -> std::result::Result<(), Failure> {
        let shell = Shell::parse(dialect).ok_or_else(|| {
            Failure::new(ExitCode::Failure, MkrunError::UnsupportedShell(dialect.to_string()))
        })?;
        self.streams
            .write_out(completion::script(shell).as_bytes())
            .map_err(|e| Failure::new(ExitCode::Failure, e))
    }

    /// Root, resolution, dispatch, invocation.
    async fn drive(&self, scan: &Scan, log: &EventLogger) -> std::result::Result<(), Failure> {
        let executor: Arc<dyn Executor> = if scan.trace {
            Arc::new(TracingExecutor::new(self.executor.clone(), log.clone()))
        } else {
            self.executor.clone()
        };

        let root = self.repository_root(&executor, scan.trace, log).await;

        let resolution = Resolver::new(
            executor.clone(),
            &self.settings.cache_root,
            &self.settings.installer,
            &self.work_dir,
            self.streams.stderr.clone(),
        )
        .resolve(scan.config_override.as_deref(), &self.metadata)
        .await
        .map_err(|e| Failure::new(ExitCode::Config, e))?;

        debug!(?resolution, "configuration resolved");

        let dispatch = dispatch(&scan.targets);

        self.invoke(executor, &root, &resolution, &dispatch)
            .await
            .map_err(|e| Failure::new(ExitCode::Target, e))
    }

    /// Ask git for the repository root; fall back to the caller's directory.
    async fn repository_root(
        &self,
        executor: &Arc<dyn Executor>,
        traced: bool,
        log: &EventLogger,
    ) -> PathBuf {
        let output = SharedBuffer::new();
        let probe = Command::new("git")
            .with_args(["rev-parse", "--show-toplevel"])
            .with_dir(&self.work_dir)
            .with_stdin(Endpoint::Null)
            .with_stdout(Endpoint::buffer(&output))
            .with_stderr(Endpoint::Null)
            .with_executor(executor.clone());

        let found = match probe.run().await {
            Ok(()) => {
                let root = output.to_string_lossy().trim().to_string();
                (!root.is_empty()).then(|| PathBuf::from(root))
            }
            Err(e) => {
                debug!(error = %e, "repository root probe failed");
                None
            }
        };

        found.unwrap_or_else(|| {
            if traced {
                log.message(&format!(
                    "repository root not found, using {}",
                    self.work_dir.display()
                ));
            }
            self.work_dir.clone()
        })
    }

    async fn invoke(
        &self,
        executor: Arc<dyn Executor>,
        root: &Path,
        resolution: &Resolution,
        dispatch: &Dispatch,
    ) -> Result<()> {
        let mut env = self.extra_env.clone();
        env.push((ENV_ROOT.to_string(), root.display().to_string()));
        env.push((ENV_CONFIG_DIR.to_string(), resolution.dir.display().to_string()));
        env.push((ENV_CONFIG_VERSION.to_string(), resolution.version.clone()));
        env.extend(dispatch.env());

        Command::new(&self.settings.build_engine)
            .with_args(["-f".to_string(), resolution.rule_file.display().to_string()])
            .with_args(dispatch.targets.iter().cloned())
            .with_dir(root)
            .with_env(env)
            .with_stdin(self.streams.stdin.clone())
            .with_stdout(self.streams.stdout.clone())
            .with_stderr(self.streams.stderr.clone())
            .with_executor(executor)
            .run()
            .await
            .map_err(|e| {
                // An engine that never started is a bare command failure; one
                // that ran and failed is reported as the launcher's call.
                if e.stage() == Stage::Waiting {
                    MkrunError::call(format!("running {}", self.settings.build_engine), e)
                } else {
                    MkrunError::Command(e)
                }
            })
    }
}
