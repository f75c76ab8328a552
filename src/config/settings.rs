// src/config/settings.rs

//! Environment-driven launcher settings.

use std::env;
use std::path::PathBuf;

use crate::cli::LogLevel;

/// Configuration override (directory or version); `--config=` wins over it.
pub const ENV_CONFIG: &str = "MKRUN_CONFIG";
/// Cache root the configuration packages are installed under.
pub const ENV_MODCACHE: &str = "MKRUN_MODCACHE";
/// Build-engine program.
pub const ENV_MAKE: &str = "MKRUN_MAKE";
/// Installer program.
pub const ENV_INSTALLER: &str = "MKRUN_INSTALLER";
/// Diagnostic log level.
pub const ENV_LOG: &str = "MKRUN_LOG";

pub const DEFAULT_BUILD_ENGINE: &str = "make";
pub const DEFAULT_INSTALLER: &str = "go";

/// Everything `mkrun` reads from its environment, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_override: Option<String>,
    pub cache_root: PathBuf,
    pub build_engine: String,
    pub installer: String,
    pub log_level: Option<LogLevel>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            config_override: get(ENV_CONFIG),
            cache_root: cache_root(&get),
            build_engine: get(ENV_MAKE).unwrap_or_else(|| DEFAULT_BUILD_ENGINE.to_string()),
            installer: get(ENV_INSTALLER).unwrap_or_else(|| DEFAULT_INSTALLER.to_string()),
            log_level: get(ENV_LOG).and_then(|s| LogLevel::parse(&s)),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// `MKRUN_MODCACHE`, then the Go module cache locations in the order the
/// Go toolchain itself uses them.
fn cache_root<F>(get: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = get(ENV_MODCACHE).or_else(|| get("GOMODCACHE")) {
        return PathBuf::from(root);
    }
    if let Some(first) = get("GOPATH").and_then(|p| env::split_paths(&p).next()) {
        if !first.as_os_str().is_empty() {
            return first.join("pkg").join("mod");
        }
    }
    if let Some(home) = get("HOME").or_else(|| get("USERPROFILE")) {
        return PathBuf::from(home).join("go").join("pkg").join("mod");
    }
    env::temp_dir().join("mkrun").join("pkg").join("mod")
}
