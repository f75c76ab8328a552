use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mkrun::exec::{
    Command, CommandError, Endpoint, ExecFuture, Executor, ExitFailure, Mode, Stage,
};

/// Snapshot of one command the fake executor was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub mode: Mode,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl RecordedCommand {
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    /// Value of an extra env var; the last assignment wins.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_dir_probe(&self) -> bool {
        self.program() == "test" && self.args.get(1).map(String::as_str) == Some("-d")
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCommand>,
    existing_dirs: HashSet<PathBuf>,
    failures: HashMap<String, i32>,
    unstartable: HashSet<String>,
    hanging: HashSet<String>,
    stdout: HashMap<String, String>,
}

/// An executor that never spawns anything:
/// - records every command it receives
/// - answers `test -d <dir>` from a set of "existing" directories
/// - fails programs registered with [`failing`](Self::failing)
/// - refuses to start programs registered with
///   [`unstartable`](Self::unstartable)
/// - never completes calls to programs registered with
///   [`hanging`](Self::hanging)
/// - writes scripted output into `Buffer` stdout endpoints.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    state: Arc<Mutex<State>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.state.lock().unwrap().existing_dirs.insert(dir.into());
        self
    }

    /// Make every call to `program` exit with `code`.
    pub fn failing(self, program: &str, code: i32) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(program.to_string(), code);
        self
    }

    /// Make every call to `program` fail as if it were not installed.
    pub fn unstartable(self, program: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .unstartable
            .insert(program.to_string());
        self
    }

    /// Record calls to `program`, then never answer them.
    pub fn hanging(self, program: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .hanging
            .insert(program.to_string());
        self
    }

    pub fn with_stdout(self, program: &str, output: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .stdout
            .insert(program.to_string(), output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<RecordedCommand> {
        self.calls()
            .into_iter()
            .filter(|c| c.program() == program)
            .collect()
    }

    /// Every directory probed with `test -d`, in order.
    pub fn probed_dirs(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter(RecordedCommand::is_dir_probe)
            .filter_map(|c| c.args.get(2).map(PathBuf::from))
            .collect()
    }

    fn answer(&self, mode: Mode, command: &Command) -> Result<(), CommandError> {
        let mut state = self.state.lock().unwrap();
        let recorded = RecordedCommand {
            mode,
            args: command.args().to_vec(),
            dir: command.dir().map(Path::to_path_buf),
            env: command.env().to_vec(),
        };
        let probe = recorded.is_dir_probe();
        state.calls.push(recorded);

        if probe {
            let dir = PathBuf::from(&command.args()[2]);
            return if state.existing_dirs.contains(&dir) {
                Ok(())
            } else {
                Err(CommandError::new(
                    command,
                    Stage::Waiting,
                    ExitFailure::new(Some(1)),
                ))
            };
        }

        if state.unstartable.contains(command.program()) {
            return Err(CommandError::new(
                command,
                Stage::Starting,
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }

        if let Some(&code) = state.failures.get(command.program()) {
            return Err(CommandError::new(
                command,
                Stage::Waiting,
                ExitFailure::new(Some(code)),
            ));
        }

        if let (Some(output), Endpoint::Buffer(buffer)) =
            (state.stdout.get(command.program()), command.stdout())
        {
            if !mode.is_detached() {
                buffer.append(output.as_bytes());
            }
        }

        Ok(())
    }
}

impl Executor for FakeExecutor {
    fn execute<'a>(&'a self, mode: Mode, command: &'a Command) -> ExecFuture<'a> {
        let result = self.answer(mode, command);
        let hang = self
            .state
            .lock()
            .unwrap()
            .hanging
            .contains(command.program());
        Box::pin(async move {
            if hang {
                std::future::pending::<()>().await;
            }
            result
        })
    }
}
