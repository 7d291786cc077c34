//! Query service: read-only projections over the sensor and actuator logs.

use ledbridge_domain::actuator::{ActuatorState, ChannelState};
use ledbridge_domain::error::{BridgeError, NotFoundError};
use ledbridge_domain::sensor::SensorSample;

use crate::ports::{ActuatorRepository, SensorRepository};

/// Rows returned by the history projections.
pub const HISTORY_LIMIT: usize = 10;

/// Latest sample paired with the actuator state in force when it was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub sample: SensorSample,
    pub led1: ChannelState,
    pub led2: ChannelState,
}

/// Application service for the read side.
pub struct QueryService<SR, AR> {
    sensors: SR,
    actuators: AR,
}

impl<SR, AR> QueryService<SR, AR>
where
    SR: SensorRepository,
    AR: ActuatorRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(sensors: SR, actuators: AR) -> Self {
        Self { sensors, actuators }
    }

    /// Latest sample joined with the nearest actuator state recorded at or
    /// before it. Channels read as `OFF` when no such state exists.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when no sample has been recorded,
    /// or a storage error from the repositories.
    pub async fn latest_snapshot(&self) -> Result<Snapshot, BridgeError> {
        let sample = self.sensors.latest().await?.ok_or(NotFoundError {
            what: "sensor sample",
        })?;
        let state = self.actuators.state_at(sample.observed_at).await?;
        let (led1, led2) = state.map_or((ChannelState::Off, ChannelState::Off), |s| {
            (s.led1, s.led2)
        });
        Ok(Snapshot { sample, led1, led2 })
    }

    /// Most recent samples, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn sensor_history(&self, limit: usize) -> Result<Vec<SensorSample>, BridgeError> {
        self.sensors.recent(limit).await
    }

    /// Most recent actuator states, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn actuator_history(
        &self,
        limit: usize,
    ) -> Result<Vec<ActuatorState>, BridgeError> {
        self.actuators.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use ledbridge_domain::time::{Timestamp, now};
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemorySensors {
        rows: Mutex<Vec<SensorSample>>,
    }

    impl SensorRepository for InMemorySensors {
        fn latest(&self) -> impl Future<Output = Result<Option<SensorSample>, BridgeError>> + Send {
            let rows = self.rows.lock().unwrap();
            let result = rows.last().copied();
            async move { Ok(result) }
        }

        fn recent(
            &self,
            limit: usize,
        ) -> impl Future<Output = Result<Vec<SensorSample>, BridgeError>> + Send {
            let rows = self.rows.lock().unwrap();
            let result: Vec<SensorSample> = rows.iter().rev().take(limit).copied().collect();
            async move { Ok(result) }
        }
    }

    #[derive(Default)]
    struct InMemoryActuators {
        rows: Mutex<Vec<ActuatorState>>,
    }

    impl ActuatorRepository for InMemoryActuators {
        fn state_at(
            &self,
            at: Timestamp,
        ) -> impl Future<Output = Result<Option<ActuatorState>, BridgeError>> + Send {
            let rows = self.rows.lock().unwrap();
            let result = rows.iter().rev().find(|s| s.recorded_at <= at).copied();
            async move { Ok(result) }
        }

        fn recent(
            &self,
            limit: usize,
        ) -> impl Future<Output = Result<Vec<ActuatorState>, BridgeError>> + Send {
            let rows = self.rows.lock().unwrap();
            let result: Vec<ActuatorState> = rows.iter().rev().take(limit).copied().collect();
            async move { Ok(result) }
        }
    }

    fn sample_at(temperature: f64, observed_at: Timestamp) -> SensorSample {
        SensorSample {
            temperature,
            humidity: 48.4,
            illuminance: 301.6,
            observed_at,
        }
    }

    fn make_service() -> QueryService<InMemorySensors, InMemoryActuators> {
        QueryService::new(InMemorySensors::default(), InMemoryActuators::default())
    }

    #[tokio::test]
    async fn should_return_not_found_without_samples() {
        let svc = make_service();
        let result = svc.latest_snapshot().await;
        assert!(matches!(result, Err(BridgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_default_channels_to_off_without_actuator_rows() {
        let svc = make_service();
        svc.sensors
            .rows
            .lock()
            .unwrap()
            .push(sample_at(29.0, now()));

        let snapshot = svc.latest_snapshot().await.unwrap();
        assert_eq!(snapshot.led1, ChannelState::Off);
        assert_eq!(snapshot.led2, ChannelState::Off);
    }

    #[tokio::test]
    async fn should_join_with_nearest_preceding_state() {
        let svc = make_service();
        let t0 = now();
        {
            let mut states = svc.actuators.rows.lock().unwrap();
            states.push(ActuatorState::new(ChannelState::On, ChannelState::Off, t0));
            states.push(ActuatorState::new(
                ChannelState::On,
                ChannelState::On,
                t0 + TimeDelta::seconds(10),
            ));
            states.push(ActuatorState::new(
                ChannelState::Off,
                ChannelState::On,
                t0 + TimeDelta::seconds(30),
            ));
        }
        svc.sensors
            .rows
            .lock()
            .unwrap()
            .push(sample_at(31.0, t0 + TimeDelta::seconds(20)));

        let snapshot = svc.latest_snapshot().await.unwrap();
        assert_eq!(snapshot.led1, ChannelState::On);
        assert_eq!(snapshot.led2, ChannelState::On);
        assert!((snapshot.sample.temperature - 31.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_return_history_newest_first() {
        let svc = make_service();
        let t0 = now();
        for i in 0..15 {
            svc.sensors
                .rows
                .lock()
                .unwrap()
                .push(sample_at(f64::from(i), t0 + TimeDelta::seconds(i.into())));
        }

        let history = svc.sensor_history(HISTORY_LIMIT).await.unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!((history[0].temperature - 14.0).abs() < f64::EPSILON);
        assert!((history[9].temperature - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_return_actuator_history() {
        let svc = make_service();
        let t0 = now();
        svc.actuators.rows.lock().unwrap().extend([
            ActuatorState::new(ChannelState::Off, ChannelState::Off, t0),
            ActuatorState::new(
                ChannelState::On,
                ChannelState::Off,
                t0 + TimeDelta::seconds(1),
            ),
        ]);

        let history = svc.actuator_history(HISTORY_LIMIT).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].led1, ChannelState::On);
    }
}
