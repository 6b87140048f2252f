//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

/// Initializes the tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    tracing::init_tracing().context("Failed to initialize tracing")
}
