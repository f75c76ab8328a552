// tests/resolve_config.rs

mod common;
use crate::common::{TestResult, init_tracing};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mkrun::config::{CUSTOM_VERSION, Resolver, candidate_dir};
use mkrun::errors::{ErrorKind, MkrunError};
use mkrun::exec::Endpoint;
use mkrun::metadata::Metadata;
use mkrun_test_utils::{FakeExecutor, test_metadata};

const CACHE: &str = "/cache";
const WORK: &str = "/work";

fn resolver(exec: &FakeExecutor) -> Resolver {
    Resolver::new(Arc::new(exec.clone()), CACHE, "go", WORK, Endpoint::Null)
}

fn installed_dir(version: &str) -> PathBuf {
    PathBuf::from(format!("/cache/github.com/mkrun/mkrun@{version}/config"))
}

#[tokio::test]
async fn no_override_uses_metadata_version_and_cache_convention() -> TestResult {
    init_tracing();
    let exec = FakeExecutor::new().with_existing_dir(installed_dir("v1.2.3"));
    let meta = test_metadata("v1.2.3");

    let res = resolver(&exec).resolve(None, &meta).await?;

    assert_eq!(res.version, "v1.2.3");
    assert_eq!(res.dir, installed_dir("v1.2.3"));
    assert_eq!(res.rule_file, installed_dir("v1.2.3").join("Makefile"));
    assert_eq!(
        res.dir,
        candidate_dir(Path::new(CACHE), &meta.package, &meta.version)
    );
    assert!(!res.is_custom());
    Ok(())
}

#[tokio::test]
async fn existing_directory_override_is_custom_and_never_installs() -> TestResult {
    init_tracing();
    let exec = FakeExecutor::new().with_existing_dir("/srv/my-config");

    let res = resolver(&exec)
        .resolve(Some("/srv/my-config"), &test_metadata("v1.2.3"))
        .await?;

    assert_eq!(res.version, CUSTOM_VERSION);
    assert_eq!(res.dir, PathBuf::from("/srv/my-config"));
    assert_eq!(res.rule_file, PathBuf::from("/srv/my-config/Makefile"));
    assert!(exec.calls_to("go").is_empty());
    assert_eq!(exec.probed_dirs(), vec![PathBuf::from("/srv/my-config")]);
    Ok(())
}

#[tokio::test]
async fn relative_directory_override_is_anchored_at_the_caller_directory() -> TestResult {
    let exec = FakeExecutor::new().with_existing_dir("/work/local-config");

    let res = resolver(&exec)
        .resolve(Some("local-config"), &test_metadata("v1.2.3"))
        .await?;

    assert_eq!(res.version, CUSTOM_VERSION);
    assert_eq!(res.dir, PathBuf::from("/work/local-config"));
    Ok(())
}

#[tokio::test]
async fn non_directory_override_is_treated_as_a_version() -> TestResult {
    let exec = FakeExecutor::new().with_existing_dir(installed_dir("v2.0.0"));

    let res = resolver(&exec)
        .resolve(Some("v2.0.0"), &test_metadata("v1.2.3"))
        .await?;

    assert_eq!(res.version, "v2.0.0");
    assert_eq!(res.dir, installed_dir("v2.0.0"));
    assert_eq!(
        exec.probed_dirs(),
        vec![PathBuf::from("/work/v2.0.0"), installed_dir("v2.0.0")]
    );
    assert!(exec.calls_to("go").is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_override_behaves_like_no_override() -> TestResult {
    let exec = FakeExecutor::new().with_existing_dir(installed_dir("v1.2.3"));
    let meta = test_metadata("v1.2.3");

    let with_empty = resolver(&exec).resolve(Some(""), &meta).await?;
    let without = resolver(&exec).resolve(None, &meta).await?;

    assert_eq!(with_empty, without);
    // No probe of the empty string as a directory.
    assert_eq!(exec.probed_dirs(), vec![installed_dir("v1.2.3"); 2]);
    Ok(())
}

#[tokio::test]
async fn missing_configuration_is_installed_exactly_once_without_reprobe() -> TestResult {
    init_tracing();
    let exec = FakeExecutor::new();

    let res = resolver(&exec)
        .resolve(None, &test_metadata("v1.2.3"))
        .await?;

    assert_eq!(res.version, "v1.2.3");
    assert_eq!(res.dir, installed_dir("v1.2.3"));

    let installs = exec.calls_to("go");
    assert_eq!(installs.len(), 1);
    assert_eq!(
        installs[0].args,
        vec!["go", "mod", "download", "github.com/mkrun/mkrun@v1.2.3"]
    );
    assert_eq!(installs[0].env_var("GOMODCACHE"), Some(CACHE));
    assert_eq!(installs[0].dir.as_deref(), Some(Path::new(WORK)));
    assert_eq!(exec.probed_dirs().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_install_is_reported_as_config_not_found() {
    init_tracing();
    let exec = FakeExecutor::new().failing("go", 1);

    let err = resolver(&exec)
        .resolve(Some("missing-version"), &test_metadata("v1.2.3"))
        .await
        .expect_err("install failure must fail resolution");

    assert_eq!(err.kind(), ErrorKind::ConfigNotFound);
    assert!(err.is_command_failure());
    assert_eq!(err.command_error().and_then(|e| e.exit_code()), Some(1));

    match err {
        MkrunError::ConfigNotFound {
            package,
            version,
            dir,
            source,
        } => {
            assert_eq!(package, "github.com/mkrun/mkrun");
            assert_eq!(version, "missing-version");
            assert_eq!(dir, installed_dir("missing-version"));
            assert_eq!(source.args()[0], "go");
        }
        other => panic!("expected ConfigNotFound, got {other:?}"),
    }
    assert_eq!(exec.calls_to("go").len(), 1);
}

#[tokio::test]
async fn upper_case_package_and_version_are_case_encoded() -> TestResult {
    let meta = Metadata::new("tool", "github.com/BurntSushi/Rules", "v1.0.0-RC1");
    let expected = PathBuf::from("/cache/github.com/!burnt!sushi/!rules@v1.0.0-!r!c1/config");
    let exec = FakeExecutor::new().with_existing_dir(&expected);

    let res = resolver(&exec).resolve(None, &meta).await?;

    assert_eq!(res.dir, expected);
    Ok(())
}

#[tokio::test]
async fn probes_run_detached() -> TestResult {
    let exec = FakeExecutor::new().with_existing_dir(installed_dir("v1.2.3"));

    resolver(&exec).resolve(None, &test_metadata("v1.2.3")).await?;

    let calls = exec.calls();
    assert!(calls.iter().all(|c| c.is_dir_probe() && c.mode.is_detached()));
    Ok(())
}
