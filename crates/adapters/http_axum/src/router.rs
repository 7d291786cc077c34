//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ledbridge_app::ports::{ActuatorRepository, SensorRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api`. Includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level and a permissive
/// [`CorsLayer`] for the dashboard.
pub fn build<SR, AR>(state: AppState<SR, AR>) -> Router
where
    SR: SensorRepository + Send + Sync + 'static,
    AR: ActuatorRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use ledbridge_app::control_loop::{ControlConfig, ControlLoop};
    use ledbridge_app::event_bus::InProcessActuatorBus;
    use ledbridge_app::ports::ControlLog;
    use ledbridge_app::services::query_service::QueryService;
    use ledbridge_domain::actuator::ActuatorState;
    use ledbridge_domain::error::BridgeError;
    use ledbridge_domain::sensor::SensorSample;
    use ledbridge_domain::time::Timestamp;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Both logs in memory; serves as control log and read side at once.
    #[derive(Default)]
    pub(crate) struct MemoryLogs {
        pub(crate) samples: Mutex<Vec<SensorSample>>,
        pub(crate) states: Mutex<Vec<ActuatorState>>,
    }

    impl ControlLog for MemoryLogs {
        async fn current_state(&self) -> Result<Option<ActuatorState>, BridgeError> {
            Ok(self.states.lock().unwrap().last().copied())
        }

        async fn commit_reading(
            &self,
            sample: SensorSample,
            state: ActuatorState,
        ) -> Result<(), BridgeError> {
            self.samples.lock().unwrap().push(sample);
            self.states.lock().unwrap().push(state);
            Ok(())
        }

        async fn commit_override(&self, state: ActuatorState) -> Result<(), BridgeError> {
            self.states.lock().unwrap().push(state);
            Ok(())
        }
    }

    impl SensorRepository for MemoryLogs {
        async fn latest(&self) -> Result<Option<SensorSample>, BridgeError> {
            Ok(self.samples.lock().unwrap().last().copied())
        }

        async fn recent(&self, limit: usize) -> Result<Vec<SensorSample>, BridgeError> {
            Ok(self
                .samples
                .lock()
                .unwrap()
                .iter()
                .rev()
                .take(limit)
                .copied()
                .collect())
        }
    }

    impl ActuatorRepository for MemoryLogs {
        async fn state_at(&self, at: Timestamp) -> Result<Option<ActuatorState>, BridgeError> {
            Ok(self
                .states
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|s| s.recorded_at <= at)
                .copied())
        }

        async fn recent(&self, limit: usize) -> Result<Vec<ActuatorState>, BridgeError> {
            Ok(self
                .states
                .lock()
                .unwrap()
                .iter()
                .rev()
                .take(limit)
                .copied()
                .collect())
        }
    }

    pub(crate) fn test_app(logs: &Arc<MemoryLogs>) -> Router {
        let (control, _task) = ControlLoop::new(
            Arc::clone(logs),
            InProcessActuatorBus::new(8),
            ControlConfig::default(),
        )
        .spawn();
        let query = QueryService::new(Arc::clone(logs), Arc::clone(logs));
        build(AppState::new(query, control))
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = test_app(&Arc::new(MemoryLogs::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_allow_cross_origin_requests() {
        let app = test_app(&Arc::new(MemoryLogs::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/history_led")
                    .header(header::ORIGIN, "http://dashboard.local")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
