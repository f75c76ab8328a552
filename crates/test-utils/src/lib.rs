//! Test doubles and helpers shared by the `mkrun` integration tests.

pub mod builders;
pub mod fake_executor;

pub use builders::{CapturedStreams, LauncherBuilder, args, test_metadata};
pub use fake_executor::{FakeExecutor, RecordedCommand};

use std::future::Future;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Filter for test diagnostics, e.g. `MKRUN_TEST_LOG=mkrun=debug`.
pub const TEST_LOG_VAR: &str = "MKRUN_TEST_LOG";

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output through the test writer. Every test may call
/// this; the first call in a test binary wins.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(TEST_LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(output) => output,
        Err(_) => panic!("test step did not finish within {TEST_TIMEOUT:?}"),
    }
}
