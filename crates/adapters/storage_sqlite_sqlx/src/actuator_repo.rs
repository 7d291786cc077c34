//! `SQLite` implementation of [`ActuatorRepository`].

use sqlx::SqlitePool;

use ledbridge_app::ports::ActuatorRepository;
use ledbridge_domain::actuator::ActuatorState;
use ledbridge_domain::error::BridgeError;
use ledbridge_domain::time::Timestamp;

use crate::error::StorageError;
use crate::row::{StateRow, encode_timestamp};

const SELECT_AT: &str = r"
    SELECT * FROM led_status
    WHERE timestamp <= ?
    ORDER BY timestamp DESC, id DESC
    LIMIT 1
";
const SELECT_RECENT: &str = "SELECT * FROM led_status ORDER BY id DESC LIMIT ?";

/// `SQLite`-backed read side of the actuator log.
pub struct SqliteActuatorRepository {
    pool: SqlitePool,
}

impl SqliteActuatorRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActuatorRepository for SqliteActuatorRepository {
    async fn state_at(&self, at: Timestamp) -> Result<Option<ActuatorState>, BridgeError> {
        let row: Option<StateRow> = sqlx::query_as(SELECT_AT)
            .bind(encode_timestamp(at))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|r| r.0))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ActuatorState>, BridgeError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<StateRow> = sqlx::query_as(SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
