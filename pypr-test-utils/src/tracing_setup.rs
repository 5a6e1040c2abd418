use tracing_subscriber::EnvFilter;

/// Route tracing output to the test harness writer, honouring `RUST_LOG`.
///
/// Idempotent; later calls are ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
