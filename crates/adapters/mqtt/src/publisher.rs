//! Outbound actuator commands on the command topic.

use rumqttc::{AsyncClient, QoS};
use serde::{Deserialize, Serialize};

use ledbridge_app::ports::ActuatorPublisher;
use ledbridge_domain::actuator::{ActuatorState, ChannelState};
use ledbridge_domain::error::BridgeError;

use crate::error::MqttError;

/// JSON body understood by the device: `{"led1": "ON", "led2": "OFF"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedCommand {
    pub led1: ChannelState,
    pub led2: ChannelState,
}

impl From<&ActuatorState> for LedCommand {
    fn from(state: &ActuatorState) -> Self {
        Self {
            led1: state.led1,
            led2: state.led2,
        }
    }
}

/// [`ActuatorPublisher`] writing [`LedCommand`]s to the command topic.
///
/// Publishes at QoS 1, the level the device subscribes with. Nothing is
/// retained: a device that reconnects waits for the next decision. A full
/// request queue fails the publish at once instead of waiting for the event
/// loop to catch up.
#[derive(Clone)]
pub struct MqttCommandPublisher {
    client: AsyncClient,
    topic: String,
}

impl MqttCommandPublisher {
    #[must_use]
    pub fn new(client: AsyncClient, topic: impl Into<String>) -> Self {
        Self {
            client,
            topic: topic.into(),
        }
    }
}

impl ActuatorPublisher for MqttCommandPublisher {
    async fn publish(&self, state: &ActuatorState) -> Result<(), BridgeError> {
        let payload =
            serde_json::to_vec(&LedCommand::from(state)).map_err(MqttError::PayloadEncode)?;

        // Never wait for room in the request queue: only the subscriber task
        // drains it, and that task may itself be waiting on the control loop.
        self.client
            .try_publish(self.topic.as_str(), QoS::AtLeastOnce, false, payload)
            .map_err(MqttError::Client)?;

        tracing::debug!(topic = %self.topic, led1 = %state.led1, led2 = %state.led2, "actuator command published");
        Ok(())
    }
}
