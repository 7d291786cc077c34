//! `SQLite` implementation of [`SensorRepository`].

use sqlx::SqlitePool;

use ledbridge_app::ports::SensorRepository;
use ledbridge_domain::error::BridgeError;
use ledbridge_domain::sensor::SensorSample;

use crate::error::StorageError;
use crate::row::SampleRow;

const SELECT_LATEST: &str = "SELECT * FROM sensor_data ORDER BY id DESC LIMIT 1";
const SELECT_RECENT: &str = "SELECT * FROM sensor_data ORDER BY id DESC LIMIT ?";

/// `SQLite`-backed read side of the sensor log.
pub struct SqliteSensorRepository {
    pool: SqlitePool,
}

impl SqliteSensorRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SensorRepository for SqliteSensorRepository {
    async fn latest(&self) -> Result<Option<SensorSample>, BridgeError> {
        let row: Option<SampleRow> = sqlx::query_as(SELECT_LATEST)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|r| r.0))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SensorSample>, BridgeError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<SampleRow> = sqlx::query_as(SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
