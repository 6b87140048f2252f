//! Tracing initialization and configuration.

use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the tracing subscriber for structured logging.
///
/// Events go to stderr so that questions printed on stdout can be piped.
/// The level is taken from `RUST_LOG` and defaults to `info`.
///
/// ```bash
/// RUST_LOG=debug quizgen
/// RUST_LOG=quizgen_rig=trace,quizgen_session=debug quizgen generate notes.pdf
/// ```
pub(super) fn init_tracing() -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;
    let fmt_layer = fmt::layer().with_writer(io::stderr).with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

/// Creates an environment filter, falling back to `info`.
fn create_env_filter() -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new("info")
            .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}")),
    }
}
