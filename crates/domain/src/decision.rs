//! Decision rule: derive the next actuator state.
//!
//! The rule is pure and infallible. Override values are expected to have
//! been normalised by the caller (see [`ChannelOverride::parse`]).

use crate::actuator::{ActuatorState, ChannelOverride, ChannelState};
use crate::sensor::SensorSample;
use crate::time::Timestamp;

/// Temperature above which the thermal channel (`led2`) switches on.
pub const THERMAL_THRESHOLD_CELSIUS: f64 = 27.0;

/// Thermal channel level for a given temperature (strictly greater than the
/// threshold turns it on).
#[must_use]
pub fn thermal_channel(temperature: f64) -> ChannelState {
    if temperature > THERMAL_THRESHOLD_CELSIUS {
        ChannelState::On
    } else {
        ChannelState::Off
    }
}

/// Compute the next actuator state.
///
/// - `led1` holds its value unless the override names it.
/// - `led2` follows [`thermal_channel`] when a sample is given, otherwise it
///   holds; an override naming it always wins.
#[must_use]
pub fn decide(
    latest: Option<&SensorSample>,
    current: &ActuatorState,
    override_: Option<&ChannelOverride>,
    now: Timestamp,
) -> ActuatorState {
    let mut led1 = current.led1;
    let mut led2 = latest.map_or(current.led2, |sample| thermal_channel(sample.temperature));

    if let Some(ovr) = override_ {
        led1 = ovr.led1.unwrap_or(led1);
        led2 = ovr.led2.unwrap_or(led2);
    }

    ActuatorState::new(led1, led2, now)
}
