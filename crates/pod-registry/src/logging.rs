//! provides logging helpers

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// Builds the event filter: `RUST_LOG` directives on top of `default_level`.
pub fn env_filter(default_level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// initiate the global tracing subscriber, logging to stderr so stdout only
/// carries rendered pods
pub fn init(default_level: LevelFilter) {
    let fmt_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter(default_level));

    registry().with(fmt_layer).init();
}
