//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `ledbridge.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use ledbridge_adapter_mqtt::MqttConfig;
use ledbridge_app::control_loop::ControlConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Control loop tuning.
    pub control: ControlSection,
    /// Broker connection and topics.
    pub mqtt: MqttConfig,
    /// Integration toggles.
    pub integrations: IntegrationsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Control loop tuning, in file-friendly units.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlSection {
    /// Upper bound for each storage call, in milliseconds.
    pub storage_timeout_ms: u64,
    /// Upper bound for each command publish, in milliseconds.
    pub publish_timeout_ms: u64,
    /// Pending commands accepted before callers wait.
    pub queue_capacity: usize,
}

/// Integration toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Connect to the broker. When off, commands only reach in-process
    /// subscribers and no sensor feed is consumed.
    pub mqtt_enabled: bool,
}

impl Config {
    /// Load configuration from `ledbridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("ledbridge.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("LEDBRIDGE_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("LEDBRIDGE_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("LEDBRIDGE_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("LEDBRIDGE_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("LEDBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("LEDBRIDGE_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(port) = var("LEDBRIDGE_MQTT_PORT").and_then(|val| val.parse().ok()) {
            self.mqtt.broker_port = port;
        }
        if let Some(val) = var("LEDBRIDGE_MQTT_USERNAME") {
            self.mqtt.username = Some(val);
        }
        if let Some(val) = var("LEDBRIDGE_MQTT_PASSWORD") {
            self.mqtt.password = Some(val);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.control.storage_timeout_ms == 0 || self.control.publish_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "control timeouts must be non-zero".to_string(),
            ));
        }
        if self.control.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "control queue capacity must be non-zero".to_string(),
            ));
        }
        if self.integrations.mqtt_enabled {
            if self.mqtt.broker_port == 0 {
                return Err(ConfigError::Validation(
                    "mqtt broker port must be non-zero".to_string(),
                ));
            }
            if self.mqtt.sensor_topic.is_empty() || self.mqtt.command_topic.is_empty() {
                return Err(ConfigError::Validation(
                    "mqtt topics must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    #[must_use]
    pub fn control_config(&self) -> ControlConfig {
        ControlConfig {
            storage_timeout: Duration::from_millis(self.control.storage_timeout_ms),
            publish_timeout: Duration::from_millis(self.control.publish_timeout_ms),
            queue_capacity: self.control.queue_capacity,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:ledbridge.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ledbridged=info,ledbridge=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ControlSection {
    fn default() -> Self {
        let defaults = ControlConfig::default();
        Self {
            storage_timeout_ms: u64::try_from(defaults.storage_timeout.as_millis())
                .unwrap_or(u64::MAX),
            publish_timeout_ms: u64::try_from(defaults.publish_timeout.as_millis())
                .unwrap_or(u64::MAX),
            queue_capacity: defaults.queue_capacity,
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self { mqtt_enabled: true }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
