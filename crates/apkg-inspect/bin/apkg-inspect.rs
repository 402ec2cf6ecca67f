//! Asset package inspector binary entry point.
//!
//! Thin wrapper that parses arguments, initializes logging on stderr and
//! hands off to [`apkg_inspect::run`] with stdout as the sink.

use anyhow::Result;
use apkg_inspect::InspectConfig;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() -> Result<()> {
    let config = InspectConfig::from_args();

    // RUST_LOG directives are layered over --log-level
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(Level::from(config.log_level)).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config.validate()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    apkg_inspect::run(&config, &mut out)
}
