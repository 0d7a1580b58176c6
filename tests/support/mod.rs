// ABOUTME: Shared fixtures for the integration tests.
// ABOUTME: Fake runtime and command channel, and a log subscriber for debugging failures.

#![allow(dead_code)]

pub mod fake_channel;
pub mod fake_runtime;

/// Route crate logs to the test harness. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("redeploy=debug")),
        )
        .with_test_writer()
        .try_init();
}
