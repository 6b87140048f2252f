//! Ctrl-C handling for long-running shell actions.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SHELL;

/// Cancels a token when Ctrl-C is pressed, until dropped.
pub struct InterruptGuard {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl InterruptGuard {
    /// Starts listening for Ctrl-C.
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let watched = token.clone();
        let handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::debug!(target: TRACING_TARGET_SHELL, "Interrupt received");
                    watched.cancel();
                }
                Err(e) => {
                    tracing::error!(
                        target: TRACING_TARGET_SHELL,
                        error = %e,
                        "Failed to install Ctrl+C handler"
                    );
                }
            }
        });

        Self { token, handle }
    }

    /// Token cancelled on Ctrl-C.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
