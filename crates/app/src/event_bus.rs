//! In-process actuator bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use ledbridge_domain::actuator::ActuatorState;
use ledbridge_domain::error::BridgeError;

use crate::ports::ActuatorPublisher;

/// In-process [`ActuatorPublisher`] using a tokio [`broadcast`] channel.
///
/// Stands in for the message bus when no broker is configured. Publishing
/// succeeds even when there are no active subscribers (the state is simply
/// dropped).
pub struct InProcessActuatorBus {
    sender: broadcast::Sender<ActuatorState>,
}

impl InProcessActuatorBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to states published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ActuatorState> {
        self.sender.subscribe()
    }
}

impl ActuatorPublisher for InProcessActuatorBus {
    fn publish(
        &self,
        state: &ActuatorState,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        // broadcast::send fails only when there are zero receivers.
        let _ = self.sender.send(*state);
        async { Ok(()) }
    }
}
