// Shared helpers for integration tests

use std::sync::Arc;
use steady_e2e::SharedDriver;
use steady_e2e::testing::FakePage;

/// Installs a test-writer tracing subscriber once per test binary.
///
/// Filter with RUST_LOG, e.g. `RUST_LOG=steady_e2e=debug`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Wraps a scripted page, returning the typed handle and the driver view.
#[allow(dead_code)]
pub fn shared(page: FakePage) -> (Arc<FakePage>, SharedDriver) {
    let page = Arc::new(page);
    let driver: SharedDriver = page.clone();
    (page, driver)
}
