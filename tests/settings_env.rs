// tests/settings_env.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mkrun::cli::{LauncherFlag, LogLevel, Shell};
use mkrun::config::{Settings, candidate_dir, escape};
use mkrun::metadata::Metadata;

fn settings(vars: &[(&str, &str)]) -> Settings {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_without_environment() {
    let s = settings(&[("HOME", "/home/dev")]);
    assert_eq!(s.config_override, None);
    assert_eq!(s.build_engine, "make");
    assert_eq!(s.installer, "go");
    assert_eq!(s.log_level, None);
    assert_eq!(s.cache_root, PathBuf::from("/home/dev/go/pkg/mod"));
}

#[test]
fn cache_root_precedence() {
    let all = [
        ("MKRUN_MODCACHE", "/a"),
        ("GOMODCACHE", "/b"),
        ("GOPATH", "/c:/d"),
        ("HOME", "/e"),
    ];
    assert_eq!(settings(&all).cache_root, PathBuf::from("/a"));
    assert_eq!(settings(&all[1..]).cache_root, PathBuf::from("/b"));
    #[cfg(unix)]
    assert_eq!(settings(&all[2..]).cache_root, PathBuf::from("/c/pkg/mod"));
    assert_eq!(settings(&all[3..]).cache_root, PathBuf::from("/e/go/pkg/mod"));
}

#[test]
fn empty_variables_count_as_unset() {
    let s = settings(&[
        ("MKRUN_CONFIG", ""),
        ("MKRUN_MODCACHE", ""),
        ("GOMODCACHE", "/b"),
        ("MKRUN_MAKE", ""),
    ]);
    assert_eq!(s.config_override, None);
    assert_eq!(s.cache_root, PathBuf::from("/b"));
    assert_eq!(s.build_engine, "make");
}

#[test]
fn overrides_are_read() {
    let s = settings(&[
        ("MKRUN_CONFIG", "v2.0.0"),
        ("MKRUN_MAKE", "gmake"),
        ("MKRUN_INSTALLER", "/opt/go/bin/go"),
        ("MKRUN_LOG", "Debug"),
    ]);
    assert_eq!(s.config_override.as_deref(), Some("v2.0.0"));
    assert_eq!(s.build_engine, "gmake");
    assert_eq!(s.installer, "/opt/go/bin/go");
    assert_eq!(s.log_level, Some(LogLevel::Debug));
}

#[test]
fn log_levels_parse_leniently() {
    assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
    assert_eq!(LogLevel::parse(" TRACE "), Some(LogLevel::Trace));
    assert_eq!(LogLevel::parse("loud"), None);
}

#[test]
fn log_levels_map_to_diagnostic_filters() {
    use tracing::level_filters::LevelFilter;

    assert_eq!(LogLevel::Error.filter(), LevelFilter::ERROR);
    assert_eq!(LogLevel::Warn.filter(), LevelFilter::WARN);
    assert_eq!(LogLevel::Trace.filter(), LevelFilter::TRACE);
    assert!(LogLevel::Info.filter() < LogLevel::Debug.filter());
}

#[test]
fn launcher_flags_are_classified_per_token() {
    assert_eq!(LauncherFlag::classify("--trace"), LauncherFlag::Trace);
    assert_eq!(LauncherFlag::classify("--version"), LauncherFlag::Version);
    assert_eq!(
        LauncherFlag::classify("--completion=zsh"),
        LauncherFlag::Completion("zsh")
    );
    assert_eq!(LauncherFlag::classify("--config="), LauncherFlag::Config(""));
    assert_eq!(
        LauncherFlag::classify("--config=./rules"),
        LauncherFlag::Config("./rules")
    );
    assert_eq!(LauncherFlag::classify("--config"), LauncherFlag::Target("--config"));
    assert_eq!(LauncherFlag::classify("--tracex"), LauncherFlag::Target("--tracex"));
    assert_eq!(Shell::parse("Fish"), Some(Shell::Fish));
    assert_eq!(Shell::parse("powershell"), None);
}

#[test]
fn module_cache_escaping() {
    assert_eq!(escape("github.com/Foo/bar"), "github.com/!foo/bar");
    assert_eq!(escape("v1.0.0"), "v1.0.0");
    assert_eq!(
        candidate_dir(Path::new("/m"), "example.com/X", "v1.0.0-Beta"),
        PathBuf::from("/m/example.com/!x@v1.0.0-!beta/config")
    );
}

#[test]
fn metadata_renders_as_toml_and_one_line() {
    let mut meta = Metadata::new("mkrun", "github.com/mkrun/mkrun", "v1.2.3");
    meta.commit = Some("abc123".into());
    meta.dirty = true;

    let toml = meta.to_toml().expect("serializable");
    assert!(toml.contains(r#"version = "v1.2.3""#));
    assert!(toml.contains(r#"commit = "abc123""#));
    assert!(!toml.contains("date"));

    assert_eq!(
        meta.to_string(),
        "mkrun v1.2.3 (github.com/mkrun/mkrun) commit=abc123 dirty"
    );
}

#[test]
fn current_metadata_carries_package_and_version() {
    let meta = Metadata::current();
    assert_eq!(meta.name, "mkrun");
    assert_eq!(meta.package, mkrun::metadata::PACKAGE_PATH);
    assert!(meta.version.starts_with('v'));
}
