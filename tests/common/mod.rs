use tracing_subscriber::EnvFilter;

/// Route library tracing to the test writer.
///
/// Reads `RUST_LOG`; defaults to `warn` if unset.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Another test in the same binary may have installed it already.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .try_init();
}
