use anyhow::{anyhow, Context, Result};
use common_auth::{CookieSameSite, JwtConfig, SessionCookie};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::tokens::MAX_ACCESS_TTL_SECONDS;

const DEFAULT_ISSUER: &str = "admin-portal";
const DEFAULT_AUDIENCE: &str = "admin-portal-clients";
const DEFAULT_ACCESS_TTL_SECONDS: i64 = 3600;
const DEFAULT_COOKIE_NAME: &str = "admin_portal_session";
const DEFAULT_PORT: u16 = 8090;

/// Everything the service needs, resolved once before the router is built.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub jwt: JwtConfig,
    pub access_ttl_seconds: i64,
    pub session_cookie: SessionCookie,
    pub users_file: Option<PathBuf>,
    pub host: IpAddr,
    pub port: u16,
}

impl ServiceConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

pub fn load_config() -> Result<ServiceConfig> {
    config_from_lookup(|key| env::var(key).ok())
}

/// Builds the config from an arbitrary key lookup so tests never touch process env.
pub fn config_from_lookup<F>(lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let issuer = lookup("JWT_ISSUER")
        .and_then(|value| normalize_optional(&value))
        .unwrap_or_else(|| DEFAULT_ISSUER.to_string());
    let audience = lookup("JWT_AUDIENCE")
        .and_then(|value| normalize_optional(&value))
        .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string());
    let signing_key = lookup("JWT_SIGNING_KEY")
        .and_then(|value| normalize_optional(&value))
        .ok_or_else(|| anyhow!("JWT_SIGNING_KEY must be set"))?;
    let leeway = parse_number::<u32>(&lookup, "JWT_CLOCK_SKEW_SECONDS")?.unwrap_or(0);

    let jwt = JwtConfig::new(issuer, audience, signing_key).with_leeway(leeway);
    jwt.validate().context("Invalid JWT settings")?;

    let access_ttl_seconds = parse_number::<i64>(&lookup, "JWT_ACCESS_TTL_SECONDS")?
        .unwrap_or(DEFAULT_ACCESS_TTL_SECONDS);
    if access_ttl_seconds <= 0 || access_ttl_seconds > MAX_ACCESS_TTL_SECONDS {
        return Err(anyhow!(
            "JWT_ACCESS_TTL_SECONDS must be between 1 and {MAX_ACCESS_TTL_SECONDS}"
        ));
    }

    let cookie_name = lookup("SESSION_COOKIE_NAME")
        .and_then(|value| normalize_optional(&value))
        .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());
    let cookie_secure = bool_from_lookup(&lookup, "SESSION_COOKIE_SECURE").unwrap_or(false);
    let cookie_same_site = lookup("SESSION_COOKIE_SAMESITE")
        .map(|value| value.parse::<CookieSameSite>())
        .transpose()
        .context("Failed to parse SESSION_COOKIE_SAMESITE")?
        .unwrap_or(CookieSameSite::Lax);
    let session_cookie = SessionCookie::new(cookie_name)
        .context("Failed to parse SESSION_COOKIE_NAME")?
        .with_secure(cookie_secure)
        .with_same_site(cookie_same_site);

    let users_file = lookup("ADMIN_PORTAL_USERS_FILE")
        .and_then(|value| normalize_optional(&value))
        .map(PathBuf::from);

    let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
    let host: IpAddr = host
        .trim()
        .parse()
        .with_context(|| format!("Invalid HOST '{host}'"))?;
    let port = parse_number::<u16>(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);

    Ok(ServiceConfig {
        jwt,
        access_ttl_seconds,
        session_cookie,
        users_file,
        host,
        port,
    })
}

fn bool_from_lookup<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn parse_number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).and_then(|value| normalize_optional(&value)) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow!("Invalid {key} '{raw}': {err}")),
        None => Ok(None),
    }
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
