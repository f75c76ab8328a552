// src/config/modcache.rs

//! Module-cache path convention for installed configuration packages.

use std::path::{Path, PathBuf};

/// Sub-directory of an installed package holding the configuration.
pub const CONFIG_SUBDIR: &str = "config";

/// Name of the rule file inside a configuration directory.
pub const RULE_FILE: &str = "Makefile";

/// Case-encode a path or version the way the module cache does: every
/// upper-case ASCII letter `X` becomes `!x`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `<cache root>/<package>@<version>/config`.
pub fn candidate_dir(cache_root: &Path, package: &str, version: &str) -> PathBuf {
    cache_root
        .join(format!("{}@{}", escape(package), escape(version)))
        .join(CONFIG_SUBDIR)
}

/// The rule file for a configuration directory.
pub fn rule_file(config_dir: &Path) -> PathBuf {
    config_dir.join(RULE_FILE)
}
