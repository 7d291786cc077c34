//! Storage ports: the append-only sensor and actuator logs.
//!
//! Writes go through [`ControlLog`] only, which the control loop owns.
//! The read side is split per log so the query façade never holds a
//! write-capable handle.

use std::future::Future;

use ledbridge_domain::actuator::ActuatorState;
use ledbridge_domain::error::BridgeError;
use ledbridge_domain::sensor::SensorSample;
use ledbridge_domain::time::Timestamp;

/// Write side of both logs, plus the lookup the control loop starts from.
pub trait ControlLog {
    /// The most recently recorded actuator state, if any.
    fn current_state(
        &self,
    ) -> impl Future<Output = Result<Option<ActuatorState>, BridgeError>> + Send;

    /// Append a sample and the state decided from it. Both rows become
    /// visible together or not at all.
    fn commit_reading(
        &self,
        sample: SensorSample,
        state: ActuatorState,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Append a state decided from an override, with no sample.
    fn commit_override(
        &self,
        state: ActuatorState,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

/// Read side of the sensor log.
pub trait SensorRepository {
    /// The most recently recorded sample, if any.
    fn latest(&self) -> impl Future<Output = Result<Option<SensorSample>, BridgeError>> + Send;

    /// The most recent samples, newest first.
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorSample>, BridgeError>> + Send;
}

/// Read side of the actuator log.
pub trait ActuatorRepository {
    /// The latest state recorded at or before `at` (temporal join).
    fn state_at(
        &self,
        at: Timestamp,
    ) -> impl Future<Output = Result<Option<ActuatorState>, BridgeError>> + Send;

    /// The most recent states, newest first.
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActuatorState>, BridgeError>> + Send;
}

impl<T: ControlLog + Send + Sync> ControlLog for std::sync::Arc<T> {
    fn current_state(
        &self,
    ) -> impl Future<Output = Result<Option<ActuatorState>, BridgeError>> + Send {
        (**self).current_state()
    }

    fn commit_reading(
        &self,
        sample: SensorSample,
        state: ActuatorState,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).commit_reading(sample, state)
    }

    fn commit_override(
        &self,
        state: ActuatorState,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).commit_override(state)
    }
}

impl<T: SensorRepository + Send + Sync> SensorRepository for std::sync::Arc<T> {
    fn latest(&self) -> impl Future<Output = Result<Option<SensorSample>, BridgeError>> + Send {
        (**self).latest()
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorSample>, BridgeError>> + Send {
        (**self).recent(limit)
    }
}

impl<T: ActuatorRepository + Send + Sync> ActuatorRepository for std::sync::Arc<T> {
    fn state_at(
        &self,
        at: Timestamp,
    ) -> impl Future<Output = Result<Option<ActuatorState>, BridgeError>> + Send {
        (**self).state_at(at)
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActuatorState>, BridgeError>> + Send {
        (**self).recent(limit)
    }
}
