use axum::extract::State;
use axum::http::{header::SET_COOKIE, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use common_auth::{inspect_failure, AuthContext, AuthError};
use common_security::{
    ensure_policy, Decision, Principal, SecurityError, GROUP_ADMINS, GROUP_SUPER_USERS,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PortalError;
use crate::tokens::TokenSubject;
use crate::AppState;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "Unable to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub expires_at: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, PortalError> {
    let users = state.users.clone();
    let LoginRequest { username, password } = request;
    let account = tokio::task::spawn_blocking(move || {
        users
            .authenticate(&username, &password)
            .map(|record| TokenSubject {
                username: record.username.clone(),
                groups: record.groups.clone(),
            })
    })
    .await
    .map_err(|err| PortalError::Internal(format!("Login task failed: {err}")))?;

    let Some(subject) = account else {
        state.metrics.login_attempt("invalid");
        return Err(PortalError::InvalidCredentials);
    };

    let issued = state.token_signer.issue(&subject)?;
    let cookie = state
        .session_cookie
        .issue(&issued.access_token, issued.expires_in)?;
    state.metrics.login_attempt("success");
    info!(username = %subject.username, groups = ?subject.groups, "login succeeded");

    let body = LoginResponse {
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
        expires_at: issued
            .expires_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    Ok((StatusCode::OK, [(SET_COOKIE, cookie)], Json(body)).into_response())
}

pub async fn logout(State(state): State<AppState>) -> Result<Response, PortalError> {
    let cookie = state.session_cookie.clear()?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response())
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub groups: Vec<String>,
    pub scheme: &'static str,
    pub expires_at: String,
}

pub async fn me(
    State(state): State<AppState>,
    auth: Result<AuthContext, AuthError>,
) -> Result<Json<MeResponse>, PortalError> {
    let auth = authenticated(&state, auth)?;
    let principal = Principal::from(&auth.claims);
    Ok(Json(MeResponse {
        subject: auth.claims.subject.clone(),
        groups: principal.groups().into_iter().map(str::to_owned).collect(),
        scheme: auth.scheme.as_str(),
        expires_at: auth
            .claims
            .expires_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

#[derive(Debug, Serialize)]
pub struct AreaResponse {
    pub area: &'static str,
    pub policy: &'static str,
    pub subject: String,
}

pub async fn admin_area(
    State(state): State<AppState>,
    auth: Result<AuthContext, AuthError>,
) -> Result<Json<AreaResponse>, PortalError> {
    protected_area(&state, auth, "admin", GROUP_ADMINS)
}

pub async fn super_area(
    State(state): State<AppState>,
    auth: Result<AuthContext, AuthError>,
) -> Result<Json<AreaResponse>, PortalError> {
    protected_area(&state, auth, "super", GROUP_SUPER_USERS)
}

fn protected_area(
    state: &AppState,
    auth: Result<AuthContext, AuthError>,
    area: &'static str,
    policy: &'static str,
) -> Result<Json<AreaResponse>, PortalError> {
    let auth = authenticated(state, auth)?;
    let principal = Principal::from(&auth.claims);
    authorize(state, policy, &principal)?;
    Ok(Json(AreaResponse {
        area,
        policy,
        subject: auth.claims.subject,
    }))
}

// Runs after the verifier has answered; inspects any failure before it becomes a response.
fn authenticated(
    state: &AppState,
    auth: Result<AuthContext, AuthError>,
) -> Result<AuthContext, PortalError> {
    auth.map_err(|err| {
        state.metrics.auth_failure(err.code());
        if inspect_failure(&err).token_expired {
            info!("rejected expired token");
        } else {
            warn!(code = err.code(), error = %err, "rejected credentials");
        }
        PortalError::Auth(err)
    })
}

fn authorize(state: &AppState, policy: &str, principal: &Principal) -> Result<(), PortalError> {
    match ensure_policy(&state.policies, policy, principal) {
        Ok(()) => {
            state.metrics.policy_decision(policy, Decision::Allow);
            Ok(())
        }
        Err(err @ SecurityError::Forbidden { .. }) => {
            state.metrics.policy_decision(policy, Decision::Deny);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
