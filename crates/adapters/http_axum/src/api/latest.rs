//! `GET /api/latest`: newest sample with the LED states in force at the time.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use ledbridge_app::ports::{ActuatorRepository, SensorRepository};
use ledbridge_app::services::query_service::Snapshot;
use ledbridge_domain::actuator::ChannelState;
use ledbridge_domain::error::BridgeError;

use super::display_timestamp;
use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

/// Dashboard view of the latest reading. Measurements are rounded to whole
/// numbers.
#[derive(Debug, Serialize)]
pub struct LatestView {
    pub temperature: i64,
    pub humidity: i64,
    pub lux: i64,
    pub led1: ChannelState,
    pub led2: ChannelState,
    pub timestamp: String,
}

impl From<Snapshot> for LatestView {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            temperature: rounded(snapshot.sample.temperature),
            humidity: rounded(snapshot.sample.humidity),
            lux: rounded(snapshot.sample.illuminance),
            led1: snapshot.led1,
            led2: snapshot.led2,
            timestamp: display_timestamp(snapshot.sample.observed_at),
        }
    }
}

// Half-to-even, so 26.5 reads as 26 on the dashboard.
#[allow(clippy::cast_possible_truncation)]
fn rounded(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Possible responses from the latest endpoint.
pub enum LatestResponse {
    Ok(Json<LatestView>),
    NoData,
}

impl IntoResponse for LatestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NoData => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "No data found".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// `GET /api/latest`
pub async fn get<SR, AR>(
    State(state): State<AppState<SR, AR>>,
) -> Result<LatestResponse, ApiError>
where
    SR: SensorRepository + Send + Sync + 'static,
    AR: ActuatorRepository + Send + Sync + 'static,
{
    match state.query_service.latest_snapshot().await {
        Ok(snapshot) => Ok(LatestResponse::Ok(Json(snapshot.into()))),
        Err(BridgeError::NotFound(_)) => Ok(LatestResponse::NoData),
        Err(err) => Err(err.into()),
    }
}
