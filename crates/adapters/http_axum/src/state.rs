//! Shared application state for axum handlers.

use std::sync::Arc;

use ledbridge_app::control_loop::ControlHandle;
use ledbridge_app::ports::{ActuatorRepository, SensorRepository};
use ledbridge_app::services::query_service::QueryService;

/// Application state shared across all axum handlers.
///
/// Generic over the read-side repositories to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repositories themselves do not
/// need to be `Clone`.
pub struct AppState<SR, AR> {
    /// Read-only projections over both logs.
    pub query_service: Arc<QueryService<SR, AR>>,
    /// Write path into the control loop.
    pub control: ControlHandle,
}

impl<SR, AR> Clone for AppState<SR, AR> {
    fn clone(&self) -> Self {
        Self {
            query_service: Arc::clone(&self.query_service),
            control: self.control.clone(),
        }
    }
}

impl<SR, AR> AppState<SR, AR>
where
    SR: SensorRepository + Send + Sync + 'static,
    AR: ActuatorRepository + Send + Sync + 'static,
{
    pub fn new(query_service: QueryService<SR, AR>, control: ControlHandle) -> Self {
        Self {
            query_service: Arc::new(query_service),
            control,
        }
    }
}
