//! `/api/onboarding`: read, advance, step back and reset the session.

use {
    axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse},
    serde_json::Value,
};

use crate::{error::ApiError, state::GatewayState};

pub async fn onboarding_get(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(state.onboarding.view().await)
}

/// Submit the current step. Body: `{"step"?: name, "payload": ...}`; an
/// empty body skips.
pub async fn onboarding_next(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}"))
        })?
    };
    Ok(Json(state.onboarding.next(params).await?))
}

pub async fn onboarding_back(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(state.onboarding.back().await)
}

pub async fn onboarding_reset(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(state.onboarding.reset().await)
}
