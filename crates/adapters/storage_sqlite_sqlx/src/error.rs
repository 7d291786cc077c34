//! Storage-specific error type wrapping sqlx errors.

use ledbridge_domain::error::BridgeError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for BridgeError {
    fn from(err: StorageError) -> Self {
        Self::StorageUnavailable(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_database_error_to_storage_unavailable() {
        let err: BridgeError = StorageError::from(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, BridgeError::StorageUnavailable(_)));
    }

    #[test]
    fn should_display_database_error() {
        let err = StorageError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.to_string(), "database error");
    }
}
