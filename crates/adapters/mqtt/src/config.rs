//! MQTT adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the MQTT bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Optional broker username.
    pub username: Option<String>,
    /// Optional broker password (only used together with `username`).
    pub password: Option<String>,
    /// Topic the device publishes sensor readings on.
    pub sensor_topic: String,
    /// Topic the device listens on for LED commands.
    pub command_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Delay before polling again after a connection error, in seconds.
    pub reconnect_delay_secs: u16,
    /// Capacity of the client request channel.
    pub channel_capacity: usize,
}

impl MqttConfig {
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.reconnect_delay_secs))
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "ledbridge".to_string(),
            username: None,
            password: None,
            sensor_topic: "bbb/sensors".to_string(),
            command_topic: "bbb/led".to_string(),
            keep_alive_secs: 30,
            reconnect_delay_secs: 5,
            channel_capacity: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "ledbridge");
        assert!(config.username.is_none());
        assert_eq!(config.sensor_topic, "bbb/sensors");
        assert_eq!(config.command_topic, "bbb/led");
        assert_eq!(config.keep_alive(), Duration::from_secs(30));
        assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            broker_host = "192.168.6.1"
            broker_port = 1884
            client_id = "bridge-1"
            username = "toan"
            password = "secret"
            sensor_topic = "greenhouse/sensors"
            command_topic = "greenhouse/led"
            keep_alive_secs = 60
            reconnect_delay_secs = 2
            channel_capacity = 8
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.6.1");
        assert_eq!(config.broker_port, 1884);
        assert_eq!(config.client_id, "bridge-1");
        assert_eq!(config.username.as_deref(), Some("toan"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.sensor_topic, "greenhouse/sensors");
        assert_eq!(config.command_topic, "greenhouse/led");
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.reconnect_delay_secs, 2);
        assert_eq!(config.channel_capacity, 8);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "10.0.0.2""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "10.0.0.2");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.sensor_topic, "bbb/sensors");
    }
}
