use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde_json::{Value, json},
    tracing::{error, warn},
    voira_onboarding::Rejection,
    voira_services::ServiceError,
};

/// JSON error response: `{"error": ..., "details"?: ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": error.into() }),
        }
    }

    /// Map a collaborator failure. Validation messages reach the client as
    /// is; anything else is logged and reported as `failure`.
    pub fn from_service(err: ServiceError, failure: &str) -> Self {
        match err {
            ServiceError::Validation { message } => Self::new(StatusCode::BAD_REQUEST, message),
            ServiceError::NotConfigured { message } => {
                error!(%message, "service not configured");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            },
            other => {
                error!(error = %other, "{failure}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({ "error": failure, "details": other.to_string() }),
                }
            },
        }
    }
}

impl From<voira_onboarding::Error> for ApiError {
    fn from(err: voira_onboarding::Error) -> Self {
        use voira_onboarding::Error;
        match err {
            Error::Rejected(reason @ Rejection::StepMismatch { .. }) => {
                Self::new(StatusCode::CONFLICT, reason.to_string())
            },
            Error::Rejected(reason) => Self::new(StatusCode::BAD_REQUEST, reason.to_string()),
            Error::Json(e) => Self::new(StatusCode::BAD_REQUEST, format!("invalid submission: {e}")),
            Error::Message { message } => Self::new(StatusCode::BAD_REQUEST, message),
            other => {
                warn!(error = %other, "onboarding request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
