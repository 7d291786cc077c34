//! History projections: the newest rows of each log.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use ledbridge_app::ports::{ActuatorRepository, SensorRepository};
use ledbridge_app::services::query_service::HISTORY_LIMIT;
use ledbridge_domain::actuator::{ActuatorState, ChannelState};
use ledbridge_domain::sensor::SensorSample;

use super::display_timestamp;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SensorRow {
    pub temperature: f64,
    pub humidity: f64,
    pub lux: f64,
    pub timestamp: String,
}

impl From<SensorSample> for SensorRow {
    fn from(sample: SensorSample) -> Self {
        Self {
            temperature: sample.temperature,
            humidity: sample.humidity,
            lux: sample.illuminance,
            timestamp: display_timestamp(sample.observed_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LedRow {
    pub led1: ChannelState,
    pub led2: ChannelState,
    pub timestamp: String,
}

impl From<ActuatorState> for LedRow {
    fn from(state: ActuatorState) -> Self {
        Self {
            led1: state.led1,
            led2: state.led2,
            timestamp: display_timestamp(state.recorded_at),
        }
    }
}

/// Possible responses from the history endpoints.
pub enum HistoryResponse<T> {
    Ok(Json<Vec<T>>),
}

impl<T: Serialize> IntoResponse for HistoryResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/history_sensors`
pub async fn sensors<SR, AR>(
    State(state): State<AppState<SR, AR>>,
) -> Result<HistoryResponse<SensorRow>, ApiError>
where
    SR: SensorRepository + Send + Sync + 'static,
    AR: ActuatorRepository + Send + Sync + 'static,
{
    let samples = state.query_service.sensor_history(HISTORY_LIMIT).await?;
    Ok(HistoryResponse::Ok(Json(
        samples.into_iter().map(SensorRow::from).collect(),
    )))
}

/// `GET /api/history_led`
pub async fn leds<SR, AR>(
    State(state): State<AppState<SR, AR>>,
) -> Result<HistoryResponse<LedRow>, ApiError>
where
    SR: SensorRepository + Send + Sync + 'static,
    AR: ActuatorRepository + Send + Sync + 'static,
{
    let states = state.query_service.actuator_history(HISTORY_LIMIT).await?;
    Ok(HistoryResponse::Ok(Json(
        states.into_iter().map(LedRow::from).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::tests::{MemoryLogs, test_app};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::TimeDelta;
    use http_body_util::BodyExt;
    use ledbridge_domain::time::Timestamp;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn fetch(logs: &Arc<MemoryLogs>, uri: &str) -> serde_json::Value {
        let response = test_app(logs)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ten_newest_samples_first() {
        let logs = Arc::new(MemoryLogs::default());
        let t0: Timestamp = "2025-03-01T10:00:00Z".parse().unwrap();
        for i in 0..12_i32 {
            logs.samples.lock().unwrap().push(SensorSample {
                temperature: f64::from(i),
                humidity: 50.5,
                illuminance: 3.0,
                observed_at: t0 + TimeDelta::seconds(i.into()),
            });
        }

        let body = fetch(&logs, "/api/history_sensors").await;

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(
            rows[0],
            serde_json::json!({
                "temperature": 11.0,
                "humidity": 50.5,
                "lux": 3.0,
                "timestamp": "2025-03-01 10:00:11",
            })
        );
        assert_eq!(rows[9]["temperature"], 2.0);
    }

    #[tokio::test]
    async fn should_return_led_history_newest_first() {
        let logs = Arc::new(MemoryLogs::default());
        let t0: Timestamp = "2025-03-01T10:00:00Z".parse().unwrap();
        logs.states.lock().unwrap().extend([
            ActuatorState::new(ChannelState::Off, ChannelState::Off, t0),
            ActuatorState::new(ChannelState::On, ChannelState::Off, t0 + TimeDelta::seconds(5)),
        ]);

        let body = fetch(&logs, "/api/history_led").await;

        assert_eq!(
            body,
            serde_json::json!([
                {"led1": "ON", "led2": "OFF", "timestamp": "2025-03-01 10:00:05"},
                {"led1": "OFF", "led2": "OFF", "timestamp": "2025-03-01 10:00:00"},
            ])
        );
    }

    #[tokio::test]
    async fn should_return_empty_lists_without_rows() {
        let logs = Arc::new(MemoryLogs::default());

        assert_eq!(fetch(&logs, "/api/history_sensors").await, serde_json::json!([]));
        assert_eq!(fetch(&logs, "/api/history_led").await, serde_json::json!([]));
    }
}
