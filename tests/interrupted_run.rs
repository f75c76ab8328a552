// tests/interrupted_run.rs

#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::path::PathBuf;
use std::time::Duration;

use mkrun::launcher::ExitCode;
use mkrun::run_with;
use mkrun_test_utils::{FakeExecutor, LauncherBuilder, args};
use tokio_util::sync::CancellationToken;

fn hanging_make() -> FakeExecutor {
    FakeExecutor::new()
        .with_existing_dir(PathBuf::from("/cache/github.com/mkrun/mkrun@v1.2.3/config"))
        .hanging("make")
}

/// Resolves once the build engine has been called.
async fn make_started(exec: &FakeExecutor) {
    while exec.calls_to("make").is_empty() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn cancelled_context_abandons_a_running_build() {
    init_tracing();
    let (launcher, exec, _io) = LauncherBuilder::new().executor(hanging_make()).build();
    let parent = CancellationToken::new();
    let argv = args(&["build"]);

    let (code, ()) = with_timeout(async {
        tokio::join!(run_with(&launcher, &parent, &argv), async {
            make_started(&exec).await;
            parent.cancel();
        })
    })
    .await;

    assert_eq!(code, ExitCode::Interrupted);
    assert_eq!(code.code(), 130);
}

#[tokio::test]
async fn finished_run_keeps_its_own_exit_code() {
    let exec = FakeExecutor::new()
        .with_existing_dir(PathBuf::from("/cache/github.com/mkrun/mkrun@v1.2.3/config"));
    let (launcher, _exec, _io) = LauncherBuilder::new().executor(exec).build();

    let code = with_timeout(run_with(&launcher, &CancellationToken::new(), &args(&["build"]))).await;

    assert_eq!(code, ExitCode::Success);
}
