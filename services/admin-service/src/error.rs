use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_auth::AuthError;
use common_security::SecurityError;
use serde::Serialize;

#[derive(Debug)]
pub enum PortalError {
    Auth(AuthError),
    Security(SecurityError),
    InvalidCredentials,
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl From<AuthError> for PortalError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<SecurityError> for PortalError {
    fn from(value: SecurityError) -> Self {
        Self::Security(value)
    }
}

impl From<anyhow::Error> for PortalError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        match self {
            PortalError::Auth(err) => err.into_response(),
            PortalError::Security(err) => err.into_response(),
            PortalError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid credentials. Please try again.".into(),
                }),
            )
                .into_response(),
            PortalError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    code: "SERVER_ERROR",
                    message,
                }),
            )
                .into_response(),
        }
    }
}
