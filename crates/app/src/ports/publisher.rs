//! Publisher port: outbound actuator commands.

use std::future::Future;

use ledbridge_domain::actuator::ActuatorState;
use ledbridge_domain::error::BridgeError;

/// Sends a decided actuator state to the device.
pub trait ActuatorPublisher {
    /// Publish the state once. Implementations must not retry.
    fn publish(
        &self,
        state: &ActuatorState,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: ActuatorPublisher + Send + Sync> ActuatorPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        state: &ActuatorState,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(state)
    }
}
