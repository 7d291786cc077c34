//! Sensor samples and the lenient inbound reading payload.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// One immutable row of the sensor log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Illuminance in lux.
    pub illuminance: f64,
    pub observed_at: Timestamp,
}

/// Reading as published by the device on the sensor topic.
///
/// Every field is optional; a missing or `null` field reads as `0`. This
/// mirrors what the device feed has always been accepted as, even though a
/// fabricated `0` also drives the thermal channel off.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SensorReading {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub lux: Option<f64>,
}

impl SensorReading {
    /// Parse a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedPayload`] when the bytes are not a
    /// JSON object or a present field is not a number.
    pub fn from_json(payload: &[u8]) -> Result<Self, ValidationError> {
        let malformed = |err: serde_json::Error| ValidationError::MalformedPayload(err.to_string());
        // Decode as an object first: the derived visitor would also take `[30]`.
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(payload).map_err(malformed)?;
        serde_json::from_value(serde_json::Value::Object(object)).map_err(malformed)
    }

    /// Names of the fields that were absent and will read as `0`.
    #[must_use]
    pub fn defaulted_fields(&self) -> Vec<&'static str> {
        [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("lux", self.lux),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect()
    }

    /// Stamp the reading into a sample, defaulting missing fields to `0`.
    #[must_use]
    pub fn into_sample(self, observed_at: Timestamp) -> SensorSample {
        SensorSample {
            temperature: self.temperature.unwrap_or_default(),
            humidity: self.humidity.unwrap_or_default(),
            illuminance: self.lux.unwrap_or_default(),
            observed_at,
        }
    }
}
