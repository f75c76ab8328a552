// src/config/resolve.rs

//! Decide where the applicable configuration lives, installing it on demand.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::modcache::{candidate_dir, rule_file};
use crate::errors::{MkrunError, Result};
use crate::exec::{Command, CommandError, Endpoint, Executor, Mode};
use crate::metadata::Metadata;

/// Version label of a configuration given as a literal directory.
pub const CUSTOM_VERSION: &str = "custom";

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Version label, or [`CUSTOM_VERSION`].
    pub version: String,
    /// Configuration directory.
    pub dir: PathBuf,
    /// Always `dir/Makefile`.
    pub rule_file: PathBuf,
}

impl Resolution {
    fn new(version: impl Into<String>, dir: PathBuf) -> Self {
        let rule_file = rule_file(&dir);
        Self {
            version: version.into(),
            dir,
            rule_file,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.version == CUSTOM_VERSION
    }
}

/// Configuration resolver.
///
/// Every filesystem question is asked through the [`Executor`], so the whole
/// probe/install sequence can be observed and scripted in tests.
#[derive(Debug, Clone)]
pub struct Resolver {
    executor: Arc<dyn Executor>,
    cache_root: PathBuf,
    installer: String,
    base_dir: PathBuf,
    output: Endpoint,
}

impl Resolver {
    /// `base_dir` anchors relative override paths; installer output goes to
    /// `output`.
    pub fn new(
        executor: Arc<dyn Executor>,
        cache_root: impl Into<PathBuf>,
        installer: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        output: Endpoint,
    ) -> Self {
        Self {
            executor,
            cache_root: cache_root.into(),
            installer: installer.into(),
            base_dir: base_dir.into(),
            output,
        }
    }

    /// Resolve the configuration for an optional override.
    ///
    /// - No (or empty) override: the metadata's own version.
    /// - Override naming an existing directory: used as is, labelled
    ///   `custom`, never installed.
    /// - Any other override: taken as a version label.
    ///
    /// A missing versioned directory is installed once; install failure is
    /// terminal.
    pub async fn resolve(
        &self,
        config_override: Option<&str>,
        metadata: &Metadata,
    ) -> Result<Resolution> {
        let version = match config_override.filter(|v| !v.is_empty()) {
            None => metadata.version.clone(),
            Some(value) => {
                let dir = self.base_dir.join(value);
                if self.dir_exists(&dir).await {
                    debug!(dir = %dir.display(), "configuration override is a directory");
                    return Ok(Resolution::new(CUSTOM_VERSION, dir));
                }
                value.to_string()
            }
        };

        let dir = candidate_dir(&self.cache_root, &metadata.package, &version);
        if self.dir_exists(&dir).await {
            debug!(%version, dir = %dir.display(), "configuration already installed");
            return Ok(Resolution::new(version, dir));
        }

        info!(package = %metadata.package, %version, "installing configuration");
        self.install(&metadata.package, &version)
            .await
            .map_err(|source| MkrunError::ConfigNotFound {
                package: metadata.package.clone(),
                version: version.clone(),
                dir: dir.clone(),
                source,
            })?;

        Ok(Resolution::new(version, dir))
    }

    /// Directory-existence probe. Any failure means "does not exist".
    pub async fn dir_exists(&self, dir: &Path) -> bool {
        let probe = Command::new("test")
            .with_args(["-d".to_string(), dir.display().to_string()])
            .with_dir(&self.base_dir)
            .with_mode(Mode::DETACHED)
            .with_executor(self.executor.clone());

        match probe.run().await {
            Ok(()) => true,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "directory probe negative");
                false
            }
        }
    }

    async fn install(&self, package: &str, version: &str) -> std::result::Result<(), CommandError> {
        Command::new(&self.installer)
            .with_args(["mod".to_string(), "download".to_string(), format!("{package}@{version}")])
            .with_dir(&self.base_dir)
            .with_env([("GOMODCACHE".to_string(), self.cache_root.display().to_string())])
            .with_stdin(Endpoint::Null)
            .with_stdout(self.output.clone())
            .with_stderr(self.output.clone())
            .with_executor(self.executor.clone())
            .run()
            .await
    }
}
