//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! via `From`, so port boundaries only ever carry this enum.

use std::time::Duration;

/// Boxed error used to carry adapter-specific failures across ports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every operation exposed by the ports.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// An inbound payload or request could not be understood.
    #[error("malformed input")]
    MalformedInput(#[from] ValidationError),

    /// A requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The persistent store could not complete the operation.
    #[error("storage unavailable")]
    StorageUnavailable(#[source] BoxError),

    /// The outbound message bus rejected or could not accept a publish.
    #[error("publish failed")]
    PublishFailure(#[source] BoxError),

    /// The control loop worker has stopped and accepts no more commands.
    #[error("control loop is not running")]
    ControlLoopClosed,
}

/// Reasons an inbound value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A channel value other than `ON`/`OFF` (case-insensitive).
    #[error("invalid channel state {0:?}, expected ON or OFF")]
    InvalidChannelState(String),

    /// A body that does not decode as the expected JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// A lookup returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{what} not found")]
pub struct NotFoundError {
    pub what: &'static str,
}

/// A storage operation exceeded its time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("storage operation timed out after {0:?}")]
pub struct StorageTimeout(pub Duration);

impl From<StorageTimeout> for BridgeError {
    fn from(err: StorageTimeout) -> Self {
        Self::StorageUnavailable(Box::new(err))
    }
}
