//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod history;
#[allow(clippy::missing_errors_doc)]
pub mod latest;
#[allow(clippy::missing_errors_doc)]
pub mod led;

use axum::Router;
use axum::routing::{get, post};

use ledbridge_app::ports::{ActuatorRepository, SensorRepository};
use ledbridge_domain::time::Timestamp;

use crate::state::AppState;

/// Timestamp layout the dashboard renders as-is.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn display_timestamp(at: Timestamp) -> String {
    at.format(DISPLAY_FORMAT).to_string()
}

/// Build the `/api` sub-router.
pub fn routes<SR, AR>() -> Router<AppState<SR, AR>>
where
    SR: SensorRepository + Send + Sync + 'static,
    AR: ActuatorRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/latest", get(latest::get::<SR, AR>))
        .route("/led", post(led::update::<SR, AR>))
        .route("/history_sensors", get(history::sensors::<SR, AR>))
        .route("/history_led", get(history::leds::<SR, AR>))
}
