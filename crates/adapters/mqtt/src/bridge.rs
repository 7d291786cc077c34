//! Connection setup and lifecycle of the MQTT bridge.

use rumqttc::{AsyncClient, EventLoop, MqttOptions};
use tokio::task::JoinHandle;

use ledbridge_app::control_loop::ControlHandle;

use crate::config::MqttConfig;
use crate::publisher::MqttCommandPublisher;
use crate::subscriber::SensorSubscriber;

/// Build a client for the configured broker.
///
/// Returns the outbound publisher, usable right away as the control loop's
/// [`ActuatorPublisher`](ledbridge_app::ports::ActuatorPublisher), and the
/// inbound side, which starts polling once a [`ControlHandle`] exists.
/// Nothing reaches the broker until [`MqttBridge::start`] drives the event
/// loop.
#[must_use]
pub fn connect(config: &MqttConfig) -> (MqttCommandPublisher, MqttBridge) {
    let mut options = MqttOptions::new(
        config.client_id.as_str(),
        config.broker_host.as_str(),
        config.broker_port,
    );
    options.set_keep_alive(config.keep_alive());
    if let Some(username) = &config.username {
        options.set_credentials(
            username.as_str(),
            config.password.as_deref().unwrap_or_default(),
        );
    }

    let (client, eventloop) = AsyncClient::new(options, config.channel_capacity);
    let publisher = MqttCommandPublisher::new(client.clone(), config.command_topic.as_str());
    let bridge = MqttBridge {
        client,
        eventloop,
        config: config.clone(),
    };
    (publisher, bridge)
}

/// Inbound half of the bridge, not yet polling.
pub struct MqttBridge {
    client: AsyncClient,
    eventloop: EventLoop,
    config: MqttConfig,
}

impl MqttBridge {
    /// Spawn the event-loop task that feeds sensor messages to `handle`.
    #[must_use]
    pub fn start(self, handle: ControlHandle) -> MqttBridgeTask {
        tracing::info!(
            host = %self.config.broker_host,
            port = self.config.broker_port,
            sensor_topic = %self.config.sensor_topic,
            command_topic = %self.config.command_topic,
            "starting MQTT bridge"
        );

        let subscriber = SensorSubscriber {
            client: self.client.clone(),
            eventloop: self.eventloop,
            sensor_topic: self.config.sensor_topic.clone(),
            reconnect_delay: self.config.reconnect_delay(),
            handle,
        };
        let task = tokio::spawn(subscriber.run());

        MqttBridgeTask {
            client: self.client,
            task,
        }
    }
}

/// Running bridge; stop it with [`shutdown`](Self::shutdown).
pub struct MqttBridgeTask {
    client: AsyncClient,
    task: JoinHandle<()>,
}

impl MqttBridgeTask {
    /// Send a DISCONNECT to the broker and stop polling.
    pub async fn shutdown(self) {
        if let Err(err) = self.client.try_disconnect() {
            tracing::debug!(error = %err, "MQTT disconnect not queued");
        }
        // Give the event loop a moment to flush the DISCONNECT.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        self.task.abort();
        tracing::info!("MQTT bridge stopped");
    }

    /// Whether the polling task has ended on its own.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
