// src/metadata.rs

//! Build/version metadata of the running launcher.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Package path the launcher and its versioned configuration are published
/// under.
pub const PACKAGE_PATH: &str = "github.com/mkrun/mkrun";

/// Immutable record describing this build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub package: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub dirty: bool,
}

impl Metadata {
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            version: version.into(),
            commit: None,
            date: None,
            dirty: false,
        }
    }

    /// Metadata baked in at compile time.
    ///
    /// `MKRUN_BUILD_VERSION`, `MKRUN_BUILD_COMMIT`, `MKRUN_BUILD_DATE` and
    /// `MKRUN_BUILD_DIRTY` may be set by the release pipeline; otherwise the
    /// crate version is used.
    pub fn current() -> Self {
        let version = option_env!("MKRUN_BUILD_VERSION")
            .map(str::to_string)
            .unwrap_or_else(|| format!("v{}", env!("CARGO_PKG_VERSION")));

        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            package: PACKAGE_PATH.to_string(),
            version,
            commit: option_env!("MKRUN_BUILD_COMMIT").map(str::to_string),
            date: option_env!("MKRUN_BUILD_DATE").map(str::to_string),
            dirty: matches!(option_env!("MKRUN_BUILD_DIRTY"), Some("1" | "true")),
        }
    }

    /// Machine-readable (TOML) form.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.package)?;
        if let Some(commit) = &self.commit {
            write!(f, " commit={commit}")?;
        }
        if let Some(date) = &self.date {
            write!(f, " date={date}")?;
        }
        if self.dirty {
            f.write_str(" dirty")?;
        }
        Ok(())
    }
}
