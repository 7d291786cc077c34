//! Inbound sensor feed driven by the rumqttc event loop.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};

use ledbridge_app::control_loop::ControlHandle;
use ledbridge_domain::actuator::ActuatorState;
use ledbridge_domain::error::BridgeError;
use ledbridge_domain::sensor::SensorReading;

/// Polls the broker connection and forwards sensor messages to the
/// control loop.
///
/// The sensor topic is subscribed at QoS 0 so the broker never redelivers a
/// reading; the control loop does not deduplicate.
pub(crate) struct SensorSubscriber {
    pub(crate) client: AsyncClient,
    pub(crate) eventloop: EventLoop,
    pub(crate) sensor_topic: String,
    pub(crate) reconnect_delay: Duration,
    pub(crate) handle: ControlHandle,
}

impl SensorSubscriber {
    /// Run until the control loop goes away.
    ///
    /// Connection errors are logged and retried after the reconnect delay;
    /// rumqttc reconnects on the next poll. The subscription is renewed on
    /// every `ConnAck` since the session is clean.
    pub(crate) async fn run(mut self) {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    tracing::info!(topic = %self.sensor_topic, "MQTT connected, subscribing");
                    // try_subscribe: this task is the one draining the request queue.
                    if let Err(err) = self
                        .client
                        .try_subscribe(self.sensor_topic.as_str(), QoS::AtMostOnce)
                    {
                        tracing::error!(error = %err, "failed to subscribe to sensor topic");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if publish.topic != self.sensor_topic {
                        tracing::debug!(topic = %publish.topic, "ignoring message on unexpected topic");
                        continue;
                    }
                    match forward(&self.handle, &publish.payload).await {
                        Ok(state) => {
                            tracing::debug!(led1 = %state.led1, led2 = %state.led2, "sensor message handled");
                        }
                        Err(BridgeError::ControlLoopClosed) => {
                            tracing::warn!("control loop closed, stopping MQTT subscriber");
                            break;
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, cause = ?std::error::Error::source(&err), "sensor message dropped");
                        }
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        retry_in = ?self.reconnect_delay,
                        "MQTT connection error"
                    );
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }
}

/// Parse one sensor payload and hand it to the control loop.
///
/// # Errors
///
/// Returns [`BridgeError::MalformedInput`] for an unparseable payload, or
/// whatever the control loop reports for the reading.
pub(crate) async fn forward(
    handle: &ControlHandle,
    payload: &[u8],
) -> Result<ActuatorState, BridgeError> {
    let reading = SensorReading::from_json(payload)?;
    handle.submit_reading(reading).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledbridge_app::control_loop::{ControlConfig, ControlLoop};
    use ledbridge_app::event_bus::InProcessActuatorBus;
    use ledbridge_app::ports::ControlLog;
    use ledbridge_domain::actuator::ChannelState;
    use ledbridge_domain::sensor::SensorSample;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryLog {
        samples: Mutex<Vec<SensorSample>>,
        states: Mutex<Vec<ActuatorState>>,
    }

    impl ControlLog for InMemoryLog {
        async fn current_state(&self) -> Result<Option<ActuatorState>, BridgeError> {
            Ok(self.states.lock().unwrap().last().copied())
        }

        async fn commit_reading(
            &self,
            sample: SensorSample,
            state: ActuatorState,
        ) -> Result<(), BridgeError> {
            self.samples.lock().unwrap().push(sample);
            self.states.lock().unwrap().push(state);
            Ok(())
        }

        async fn commit_override(&self, state: ActuatorState) -> Result<(), BridgeError> {
            self.states.lock().unwrap().push(state);
            Ok(())
        }
    }

    fn spawn_control(log: &Arc<InMemoryLog>) -> ControlHandle {
        let (handle, _task) = ControlLoop::new(
            Arc::clone(log),
            InProcessActuatorBus::new(8),
            ControlConfig::default(),
        )
        .spawn();
        handle
    }

    #[tokio::test]
    async fn should_forward_valid_payload() {
        let log = Arc::new(InMemoryLog::default());
        let handle = spawn_control(&log);

        let state = forward(&handle, br#"{"temperature": 30, "humidity": 70, "lux": 15}"#)
            .await
            .unwrap();

        assert_eq!(state.led2, ChannelState::On);
        let samples = log.samples.lock().unwrap();
        assert_eq!(samples.len(), 1);
        assert!((samples[0].illuminance - 15.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_forward_partial_payload_with_defaults() {
        let log = Arc::new(InMemoryLog::default());
        let handle = spawn_control(&log);

        let state = forward(&handle, br#"{"lux": 15}"#).await.unwrap();

        assert_eq!(state.led2, ChannelState::Off);
        assert_eq!(log.samples.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_drop_malformed_payload_before_control_loop() {
        let log = Arc::new(InMemoryLog::default());
        let handle = spawn_control(&log);

        let result = forward(&handle, b"not json").await;

        assert!(matches!(result, Err(BridgeError::MalformedInput(_))));
        assert!(log.samples.lock().unwrap().is_empty());
        assert!(log.states.lock().unwrap().is_empty());
    }
}
