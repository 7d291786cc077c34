//! `POST /api/led`: manual override of one or both channels.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use ledbridge_app::ports::{ActuatorRepository, SensorRepository};
use ledbridge_domain::actuator::{ActuatorState, ChannelOverride, ChannelState};
use ledbridge_domain::error::{BridgeError, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body; an omitted channel keeps its current value.
#[derive(Debug, Default, Deserialize)]
pub struct LedRequest {
    #[serde(default)]
    pub led1: Option<String>,
    #[serde(default)]
    pub led2: Option<String>,
}

impl LedRequest {
    /// Parse a raw body. An empty body is the same as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, BridgeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|err| ValidationError::MalformedPayload(err.to_string()).into())
    }
}

/// Acknowledgement carrying the state that was recorded.
#[derive(Debug, Serialize)]
pub struct LedView {
    pub success: bool,
    pub led1: ChannelState,
    pub led2: ChannelState,
}

impl From<ActuatorState> for LedView {
    fn from(state: ActuatorState) -> Self {
        Self {
            success: true,
            led1: state.led1,
            led2: state.led2,
        }
    }
}

/// Possible responses from the override endpoint.
pub enum UpdateResponse {
    Ok(Json<LedView>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/led`
pub async fn update<SR, AR>(
    State(state): State<AppState<SR, AR>>,
    body: Bytes,
) -> Result<UpdateResponse, ApiError>
where
    SR: SensorRepository + Send + Sync + 'static,
    AR: ActuatorRepository + Send + Sync + 'static,
{
    let request = LedRequest::from_body(&body)?;
    let request = ChannelOverride::parse(request.led1.as_deref(), request.led2.as_deref())
        .map_err(BridgeError::from)?;

    let recorded = state.control.request_override(request).await?;
    Ok(UpdateResponse::Ok(Json(recorded.into())))
}
