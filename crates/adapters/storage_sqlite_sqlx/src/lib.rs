//! # ledbridge-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the log port traits defined in `ledbridge-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Tables
//! - `sensor_data`: one row per recorded sample
//! - `led_status`: one row per recorded actuator state
//!
//! Both are append-only and keyed by an autoincrement `id`. Timestamps are
//! stored as fixed-width RFC 3339 UTC text with microseconds, so text order
//! is time order.
//!
//! ## Dependency rule
//! Depends on `ledbridge-app` (for port traits) and `ledbridge-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod actuator_repo;
mod control_log;
mod error;
mod pool;
mod row;
mod sensor_repo;

pub use actuator_repo::SqliteActuatorRepository;
pub use control_log::SqliteControlLog;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use sensor_repo::SqliteSensorRepository;
