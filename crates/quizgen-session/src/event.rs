use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::state::SessionPhase;

/// Capacity of the session event channel.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A blocking action that does not change the session phase on its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Generate,
    Export,
}

/// Notification sent to [`Session::subscribe`](crate::Session::subscribe) receivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session moved between phases.
    StateChanged {
        from: SessionPhase,
        to: SessionPhase,
    },
    /// An action began running.
    ActionStarted { action: SessionAction },
    /// An action completed, successfully or not.
    ActionFinished { action: SessionAction, ok: bool },
}

impl SessionEvent {
    /// Returns true when the session started long-running work.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::StateChanged {
                to: SessionPhase::Processing,
                ..
            } | Self::ActionStarted { .. }
        )
    }
}
