use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

use crate::claims::Claims;
use crate::error::{AuthError, AuthResult};
use crate::session::SessionCookie;
use crate::verifier::JwtVerifier;

/// Which credential carried the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Cookie,
    Bearer,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Cookie => "cookie",
            AuthScheme::Bearer => "bearer",
        }
    }
}

/// Extracts verified JWT claims from the request using the configured verifier.
///
/// An `Authorization` header always wins when present; otherwise the session
/// cookie is used.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
    pub token: String,
    pub scheme: AuthScheme,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<JwtVerifier>: FromRef<S>,
    Arc<SessionCookie>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<JwtVerifier>::from_ref(state);
        let cookie = Arc::<SessionCookie>::from_ref(state);

        let (token, scheme) = credential(&parts.headers, &cookie)?;
        let claims = verifier.verify(&token)?;

        Ok(Self {
            claims,
            token,
            scheme,
        })
    }
}

fn credential(headers: &HeaderMap, cookie: &SessionCookie) -> AuthResult<(String, AuthScheme)> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        return parse_bearer(value).map(|token| (token, AuthScheme::Bearer));
    }

    cookie
        .read(headers)
        .map(|token| (token, AuthScheme::Cookie))
        .ok_or(AuthError::MissingCredentials)
}

fn parse_bearer(value: &axum::http::HeaderValue) -> AuthResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthorization)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthorization);
    }

    Ok(token.to_owned())
}
