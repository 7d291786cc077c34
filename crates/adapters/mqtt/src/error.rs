//! MQTT adapter error types.

use ledbridge_domain::error::BridgeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to encode an outgoing MQTT payload as JSON.
    #[error("failed to encode MQTT payload")]
    PayloadEncode(#[source] serde_json::Error),
}

impl MqttError {
    /// Convert into a [`BridgeError::PublishFailure`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> BridgeError {
        BridgeError::PublishFailure(Box::new(self))
    }
}

impl From<MqttError> for BridgeError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_encode_error_to_publish_failure() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err: BridgeError = MqttError::PayloadEncode(json_err).into();
        assert!(matches!(err, BridgeError::PublishFailure(_)));
    }

    #[test]
    fn should_display_encode_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = MqttError::PayloadEncode(json_err);
        assert_eq!(err.to_string(), "failed to encode MQTT payload");
    }
}
