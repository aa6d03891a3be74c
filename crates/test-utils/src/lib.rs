//! Helpers shared by flowdag's integration tests.

pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use flowdag::logging::LOG_ENV;
use tracing_subscriber::EnvFilter;

/// Upper bound for runtime tests driven entirely by in-process fakes.
pub const FAKE_RUN_LIMIT: Duration = Duration::from_secs(2);

/// Upper bound for runtime tests that spawn shell processes.
pub const PROCESS_RUN_LIMIT: Duration = Duration::from_secs(10);

static TRACING: Once = Once::new();

/// Install a per-test subscriber once per test binary.
///
/// The filter is read from `FLOWDAG_LOG`, the same variable the binary
/// honours, and defaults to `flowdag=debug`. Output is captured by the test
/// harness and only shown for failing tests.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("flowdag=debug"));

        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `future`, failing the test if it runs past `limit`.
pub async fn with_timeout<F: Future>(limit: Duration, future: F) -> F::Output {
    match tokio::time::timeout(limit, future).await {
        Ok(output) => output,
        Err(_) => panic!("test future did not finish within {limit:?}"),
    }
}
