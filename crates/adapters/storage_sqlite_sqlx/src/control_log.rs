//! `SQLite` implementation of [`ControlLog`].

use sqlx::SqlitePool;

use ledbridge_app::ports::ControlLog;
use ledbridge_domain::actuator::ActuatorState;
use ledbridge_domain::error::BridgeError;
use ledbridge_domain::sensor::SensorSample;

use crate::error::StorageError;
use crate::row::{INSERT_SAMPLE, INSERT_STATE, StateRow, encode_timestamp};

const SELECT_CURRENT: &str = "SELECT * FROM led_status ORDER BY timestamp DESC, id DESC LIMIT 1";

/// `SQLite`-backed write side of both logs.
pub struct SqliteControlLog {
    pool: SqlitePool,
}

impl SqliteControlLog {
    /// Create a new log using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ControlLog for SqliteControlLog {
    async fn current_state(&self) -> Result<Option<ActuatorState>, BridgeError> {
        let row: Option<StateRow> = sqlx::query_as(SELECT_CURRENT)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|r| r.0))
    }

    async fn commit_reading(
        &self,
        sample: SensorSample,
        state: ActuatorState,
    ) -> Result<(), BridgeError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(INSERT_SAMPLE)
            .bind(sample.temperature)
            .bind(sample.humidity)
            .bind(sample.illuminance)
            .bind(encode_timestamp(sample.observed_at))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        sqlx::query(INSERT_STATE)
            .bind(state.led1.as_str())
            .bind(state.led2.as_str())
            .bind(encode_timestamp(state.recorded_at))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn commit_override(&self, state: ActuatorState) -> Result<(), BridgeError> {
        sqlx::query(INSERT_STATE)
            .bind(state.led1.as_str())
            .bind(state.led2.as_str())
            .bind(encode_timestamp(state.recorded_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
