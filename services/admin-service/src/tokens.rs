use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use common_auth::JwtConfig;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

/// Longest access-token lifetime accepted (30 days).
pub const MAX_ACCESS_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

pub struct TokenSigner {
    issuer: String,
    audience: String,
    access_ttl_seconds: i64,
    encoding_key: EncodingKey,
}

pub struct TokenSubject {
    pub username: String,
    pub groups: Vec<String>,
}

pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
    pub token_type: &'static str,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig, access_ttl_seconds: i64) -> Result<Self> {
        config
            .validate()
            .map_err(|err| anyhow!("Refusing to sign with invalid settings: {err}"))?;
        if access_ttl_seconds <= 0 || access_ttl_seconds > MAX_ACCESS_TTL_SECONDS {
            return Err(anyhow!(
                "Access token lifetime must be between 1 and {MAX_ACCESS_TTL_SECONDS} seconds"
            ));
        }

        Ok(Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl_seconds,
            encoding_key: config.encoding_key(),
        })
    }

    pub fn issue(&self, subject: &TokenSubject) -> Result<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    /// Signs a token as if issued at `now`; lets tests mint already-expired tokens.
    pub fn issue_at(&self, subject: &TokenSubject, now: DateTime<Utc>) -> Result<IssuedToken> {
        let expires_at = Duration::try_seconds(self.access_ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| anyhow!("Access token expiry overflows the supported time range"))?;

        let claims = AccessClaims {
            sub: &subject.username,
            groups: &subject.groups,
            iss: &self.issuer,
            aud: &self.audience,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| anyhow!("Failed to sign access token: {err}"))?;

        Ok(IssuedToken {
            access_token,
            expires_at,
            expires_in: self.access_ttl_seconds,
            token_type: "Bearer",
        })
    }
}

#[derive(Serialize)]
struct AccessClaims<'a> {
    sub: &'a str,
    groups: &'a [String],
    iss: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
    nbf: i64,
    jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_auth::{AuthError, JwtVerifier};

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn subject() -> TokenSubject {
        TokenSubject {
            username: "alice".into(),
            groups: vec!["Admins".into()],
        }
    }

    #[test]
    fn issued_token_verifies() {
        let config = JwtConfig::new("iss", "aud", KEY);
        let signer = TokenSigner::new(&config, 300).expect("signer");
        let verifier = JwtVerifier::new(config).expect("verifier");

        let issued = signer.issue(&subject()).expect("token");
        assert_eq!(issued.expires_in, 300);
        assert_eq!(issued.token_type, "Bearer");

        let claims = verifier.verify(&issued.access_token).expect("verified");
        assert_eq!(claims.subject, "alice");
        assert!(claims.has_group("Admins"));
        assert_eq!(claims.expires_at.timestamp(), issued.expires_at.timestamp());
    }

    #[test]
    fn backdated_token_is_expired() {
        let config = JwtConfig::new("iss", "aud", KEY);
        let signer = TokenSigner::new(&config, 60).expect("signer");
        let verifier = JwtVerifier::new(config).expect("verifier");

        let issued = signer
            .issue_at(&subject(), Utc::now() - Duration::seconds(600))
            .expect("token");
        let err = verifier.verify(&issued.access_token).expect_err("expired");
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn rejects_bad_settings() {
        let config = JwtConfig::new("iss", "aud", KEY);
        assert!(TokenSigner::new(&JwtConfig::new("iss", "aud", "short"), 60).is_err());
        assert!(TokenSigner::new(&config, 0).is_err());
        assert!(TokenSigner::new(&config, MAX_ACCESS_TTL_SECONDS + 1).is_err());
        assert!(TokenSigner::new(&config, i64::MAX).is_err());
        assert!(TokenSigner::new(&config, MAX_ACCESS_TTL_SECONDS).is_ok());
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        let signer = TokenSigner::new(&JwtConfig::new("iss", "aud", KEY), 60).expect("signer");
        let result = signer.issue_at(&subject(), DateTime::<Utc>::MAX_UTC);
        assert!(result.is_err());
    }
}
