// src/dispatch.rs

//! Split requested targets into build-engine targets and captured
//! trailing arguments.
//!
//! `make` cannot take "one target plus an arbitrary argument list". For verbs
//! that conventionally want one (`run-server --port 80`, `git-log -3`, ...),
//! everything after the first such verb is joined into a single `ARGS`
//! assignment instead of being passed as more targets.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Environment variable receiving captured trailing arguments.
pub const EXTRA_ARGS_VAR: &str = "ARGS";

/// A family of target names whose trailing tokens are captured.
#[derive(Debug)]
pub struct VerbRule {
    pub family: &'static str,
    pattern: Regex,
}

impl VerbRule {
    fn new(family: &'static str, pattern: &str) -> Self {
        Self {
            family,
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid verb pattern {pattern:?}: {e}")),
        }
    }

    pub fn matches(&self, target: &str) -> bool {
        self.pattern.is_match(target)
    }
}

/// Ordered table of capturing verbs; the first matching rule wins.
pub static VERB_RULES: LazyLock<Vec<VerbRule>> = LazyLock::new(|| {
    [
        ("call", r"^call-"),
        ("show", r"^show-"),
        ("test", r"^test-"),
        ("lint", r"^lint-"),
        ("run", r"^run-"),
        ("version", r"^version-"),
        ("update", r"^update-"),
        ("git", r"^git-"),
    ]
    .into_iter()
    .map(|(family, pattern)| VerbRule::new(family, pattern))
    .collect()
});

/// The capturing rule `target` falls under, if any.
pub fn capturing_rule(target: &str) -> Option<&'static VerbRule> {
    VERB_RULES.iter().find(|rule| rule.matches(target))
}

/// Targets and environment for one build-engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub targets: Vec<String>,
    /// Space-joined tail after the first capturing verb.
    pub extra_args: Option<String>,
}

impl Dispatch {
    /// Environment assignments to add to the invocation.
    pub fn env(&self) -> Vec<(String, String)> {
        self.extra_args
            .iter()
            .map(|args| (EXTRA_ARGS_VAR.to_string(), args.clone()))
            .collect()
    }
}

/// Split `targets` at the first capturing verb that is not the last token.
pub fn dispatch(targets: &[String]) -> Dispatch {
    let split = targets
        .iter()
        .enumerate()
        .take(targets.len().saturating_sub(1))
        .find_map(|(idx, target)| capturing_rule(target).map(|rule| (idx, rule)));

    match split {
        Some((idx, rule)) => {
            let tail = targets[idx + 1..].join(" ");
            debug!(verb = %targets[idx], family = rule.family, args = %tail, "capturing trailing arguments");
            Dispatch {
                targets: targets[..=idx].to_vec(),
                extra_args: Some(tail),
            }
        }
        None => Dispatch {
            targets: targets.to_vec(),
            extra_args: None,
        },
    }
}
