//! Actuator state: the two LED channels and their event-sourced log rows.
//!
//! Channel naming follows the device protocol:
//! - `led1` is the **manual** channel, only ever changed by an override.
//! - `led2` is the **thermal** channel, derived from the temperature unless
//!   an override names it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// Output level of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelState {
    On,
    #[default]
    Off,
}

impl ChannelState {
    /// Upper-case wire form (`"ON"` / `"OFF"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelState {
    type Err = ValidationError;

    /// Case-insensitive parse; anything besides `on`/`off` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("on") {
            Ok(Self::On)
        } else if s.eq_ignore_ascii_case("off") {
            Ok(Self::Off)
        } else {
            Err(ValidationError::InvalidChannelState(s.to_string()))
        }
    }
}

/// One immutable row of the actuator log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorState {
    pub led1: ChannelState,
    pub led2: ChannelState,
    pub recorded_at: Timestamp,
}

impl ActuatorState {
    #[must_use]
    pub fn new(led1: ChannelState, led2: ChannelState, recorded_at: Timestamp) -> Self {
        Self {
            led1,
            led2,
            recorded_at,
        }
    }

    /// Baseline used when nothing has been recorded yet: both channels off,
    /// stamped at the Unix epoch so any real write sorts after it.
    #[must_use]
    pub fn initial() -> Self {
        Self::new(
            ChannelState::Off,
            ChannelState::Off,
            Timestamp::UNIX_EPOCH,
        )
    }

    /// Whether both channels match, ignoring the timestamp.
    #[must_use]
    pub fn same_channels(&self, other: &Self) -> bool {
        self.led1 == other.led1 && self.led2 == other.led2
    }
}

/// A partial actuator state supplied by a user.
///
/// A `None` channel keeps its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelOverride {
    pub led1: Option<ChannelState>,
    pub led2: Option<ChannelState>,
}

impl ChannelOverride {
    /// Normalise raw channel strings into an override.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidChannelState`] for any value other
    /// than `on`/`off` in any letter case.
    pub fn parse(led1: Option<&str>, led2: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            led1: led1.map(str::parse).transpose()?,
            led2: led2.map(str::parse).transpose()?,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.led1.is_none() && self.led2.is_none()
    }
}
