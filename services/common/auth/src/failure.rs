//! Post-validation failure inspection.
//!
//! After the token verifier returns an error, callers run [`inspect_failure`]
//! to derive the annotations that belong on the rejection response. This is
//! an ordinary function over the error value; nothing is registered or
//! invoked behind the caller's back.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::AuthError;

/// Response header set when the presented token was well-formed but expired.
pub const TOKEN_EXPIRED_HEADER: &str = "token-expired";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureAnnotations {
    pub token_expired: bool,
}

impl FailureAnnotations {
    pub fn is_empty(&self) -> bool {
        !self.token_expired
    }

    pub fn apply(&self, headers: &mut HeaderMap) {
        if self.token_expired {
            headers.insert(
                HeaderName::from_static(TOKEN_EXPIRED_HEADER),
                HeaderValue::from_static("true"),
            );
        }
    }
}

pub fn inspect_failure(error: &AuthError) -> FailureAnnotations {
    FailureAnnotations {
        token_expired: matches!(error, AuthError::TokenExpired),
    }
}
