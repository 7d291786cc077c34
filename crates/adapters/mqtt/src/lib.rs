//! # ledbridge-adapter-mqtt
//!
//! MQTT adapter: the link between the device and the control loop.
//!
//! ## Responsibilities
//! - Connect to the broker (optionally with credentials)
//! - Subscribe to the sensor topic and submit each reading to the
//!   [`ControlHandle`](ledbridge_app::control_loop::ControlHandle)
//! - Publish every persisted [`ActuatorState`](ledbridge_domain::actuator::ActuatorState)
//!   as a JSON command on the command topic
//!
//! Malformed messages and connection errors are logged and dropped here; the
//! bridge keeps polling until the control loop is gone.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `ledbridge-app` and `ledbridge-domain`.

mod bridge;
mod config;
mod error;
mod publisher;
mod subscriber;

pub use bridge::{MqttBridge, MqttBridgeTask, connect};
pub use config::MqttConfig;
pub use error::MqttError;
pub use publisher::{LedCommand, MqttCommandPublisher};
