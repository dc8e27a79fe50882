use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Route tracing output through the test harness's captured writer.
///
/// Uses `RUST_LOG` when set and debug output for the envlayer crates
/// otherwise. Safe to call from every test: only the first call in a
/// process installs anything.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("envlayer_core=debug,envlayer_dataset=debug"));

    let fmt_layer = fmt::layer()
        .with_test_writer()
        .with_target(true)
        .compact();

    // Another test may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
