use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::error::{AuthError, AuthResult};

/// Shortest symmetric key accepted for HS256 signing.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

/// Runtime configuration for JWT issuing and verification.
///
/// Built once at startup and shared by reference; nothing re-reads it per request.
#[derive(Clone)]
pub struct JwtConfig {
    /// Expected issuer claim (iss).
    pub issuer: String,
    /// Expected audience claim (aud).
    pub audience: String,
    /// Allowable clock skew in seconds when validating exp/nbf.
    pub leeway_seconds: u32,
    signing_key: Vec<u8>,
}

impl JwtConfig {
    /// Construct config with zero clock skew.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        signing_key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_seconds: 0,
            signing_key: signing_key.into(),
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn validate(&self) -> AuthResult<()> {
        if self.issuer.trim().is_empty() {
            return Err(AuthError::KeyConfig("issuer must not be empty".into()));
        }
        if self.audience.trim().is_empty() {
            return Err(AuthError::KeyConfig("audience must not be empty".into()));
        }
        if self.signing_key.len() < MIN_SIGNING_KEY_BYTES {
            return Err(AuthError::KeyConfig(format!(
                "signing key must be at least {MIN_SIGNING_KEY_BYTES} bytes, got {}",
                self.signing_key.len()
            )));
        }
        Ok(())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.signing_key)
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.signing_key)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}
