use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::FromRef;
use common_auth::{JwtVerifier, SessionCookie};
use common_security::PolicyRegistry;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::metrics::PortalMetrics;
use crate::tokens::TokenSigner;
use crate::users::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub jwt_verifier: Arc<JwtVerifier>,
    pub token_signer: Arc<TokenSigner>,
    pub session_cookie: Arc<SessionCookie>,
    pub policies: Arc<PolicyRegistry>,
    pub users: Arc<UserDirectory>,
    pub metrics: Arc<PortalMetrics>,
}

impl AppState {
    /// Wires every collaborator from a config resolved at startup.
    pub fn from_config(config: &ServiceConfig, users: UserDirectory) -> Result<Self> {
        let jwt_verifier =
            JwtVerifier::new(config.jwt.clone()).context("Failed to build JWT verifier")?;
        let token_signer = TokenSigner::new(&config.jwt, config.access_ttl_seconds)?;
        let policies = PolicyRegistry::standard();
        info!(policies = ?policies.names(), users = users.len(), "authorization wired");
        if users.is_empty() {
            warn!("user directory is empty; /login will reject every attempt");
        }

        Ok(Self {
            jwt_verifier: Arc::new(jwt_verifier),
            token_signer: Arc::new(token_signer),
            session_cookie: Arc::new(config.session_cookie.clone()),
            policies: Arc::new(policies),
            users: Arc::new(users),
            metrics: Arc::new(PortalMetrics::new()?),
        })
    }
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_verifier.clone()
    }
}

impl FromRef<AppState> for Arc<SessionCookie> {
    fn from_ref(state: &AppState) -> Self {
        state.session_cookie.clone()
    }
}
