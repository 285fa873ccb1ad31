//! Log output for the command-line tools.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Install a stderr subscriber without timestamps.
///
/// `default` applies when `RUST_LOG` is unset or does not mention a
/// target. Records from the `log` facade, which the library crates use,
/// are routed into the same subscriber.
pub fn init(default: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_level(true)
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}
