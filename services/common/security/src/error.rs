use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("no policy named '{0}' is registered")]
    UnknownPolicy(String),
    #[error("policy '{0}' registered more than once")]
    DuplicatePolicy(String),
    #[error("access denied by policy '{policy}'")]
    Forbidden { policy: String },
}

impl SecurityError {
    pub fn status(&self) -> StatusCode {
        match self {
            SecurityError::Forbidden { .. } => StatusCode::FORBIDDEN,
            SecurityError::UnknownPolicy(_) | SecurityError::DuplicatePolicy(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SecurityError::Forbidden { .. } => "FORBIDDEN",
            SecurityError::UnknownPolicy(_) => "POLICY_UNKNOWN",
            SecurityError::DuplicatePolicy(_) => "POLICY_DUPLICATE",
        }
    }
}

impl From<SecurityError> for (StatusCode, String) {
    fn from(e: SecurityError) -> Self {
        (e.status(), e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for SecurityError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
