use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber once per process.
///
/// `RUST_LOG` wins over `default_level`. Output goes through the test
/// writer so it is captured per test case. Later calls are no-ops.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Err only means a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
