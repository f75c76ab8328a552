#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mkrun::config::Settings;
use mkrun::exec::{Endpoint, SharedBuffer, StdStreams};
use mkrun::launcher::Launcher;
use mkrun::metadata::Metadata;

use crate::fake_executor::FakeExecutor;

pub const TEST_PACKAGE: &str = "github.com/mkrun/mkrun";

pub fn test_metadata(version: &str) -> Metadata {
    Metadata::new("mkrun", TEST_PACKAGE, version)
}

/// Buffered stdin/stdout/stderr for inspecting what a launcher printed.
#[derive(Debug, Clone, Default)]
pub struct CapturedStreams {
    pub stdout: SharedBuffer,
    pub stderr: SharedBuffer,
}

impl CapturedStreams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streams(&self) -> StdStreams {
        StdStreams {
            stdin: Endpoint::Null,
            stdout: Endpoint::buffer(&self.stdout),
            stderr: Endpoint::buffer(&self.stderr),
        }
    }

    pub fn out(&self) -> String {
        self.stdout.to_string_lossy()
    }

    pub fn err(&self) -> String {
        self.stderr.to_string_lossy()
    }
}

/// Builder for a `Launcher` wired to a `FakeExecutor` and captured streams.
pub struct LauncherBuilder {
    metadata: Metadata,
    settings: Settings,
    work_dir: PathBuf,
    executor: FakeExecutor,
}

impl LauncherBuilder {
    pub fn new() -> Self {
        let mut settings = Settings::default();
        settings.cache_root = PathBuf::from("/cache");
        Self {
            metadata: test_metadata("v1.2.3"),
            settings,
            work_dir: PathBuf::from("/work"),
            executor: FakeExecutor::new(),
        }
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.metadata.version = version.to_string();
        self
    }

    pub fn cache_root(mut self, root: impl AsRef<Path>) -> Self {
        self.settings.cache_root = root.as_ref().to_path_buf();
        self
    }

    pub fn env_override(mut self, value: &str) -> Self {
        self.settings.config_override = Some(value.to_string());
        self
    }

    pub fn work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn executor(mut self, executor: FakeExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// The launcher, a handle on its executor, and its captured streams.
    pub fn build(self) -> (Launcher, FakeExecutor, CapturedStreams) {
        let captured = CapturedStreams::new();
        let launcher = Launcher::new(
            self.metadata,
            Arc::new(self.executor.clone()),
            self.settings,
            captured.streams(),
            self.work_dir,
        );
        (launcher, self.executor, captured)
    }
}

impl Default for LauncherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert string literals into an owned argument vector.
pub fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}
