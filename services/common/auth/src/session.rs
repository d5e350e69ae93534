use std::str::FromStr;

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSameSite {
    Lax,
    Strict,
    None,
}

impl CookieSameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieSameSite::Lax => "Lax",
            CookieSameSite::Strict => "Strict",
            CookieSameSite::None => "None",
        }
    }
}

impl FromStr for CookieSameSite {
    type Err = AuthError;

    fn from_str(value: &str) -> AuthResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(CookieSameSite::Lax),
            "strict" => Ok(CookieSameSite::Strict),
            "none" => Ok(CookieSameSite::None),
            other => Err(AuthError::InvalidCookie(format!(
                "unsupported same-site policy '{other}', use Lax, Strict, or None"
            ))),
        }
    }
}

/// Session cookie carrying the signed access token.
///
/// The cookie is stateless: its value is the JWT itself, so there is no
/// server-side session store to consult or expire.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    secure: bool,
    same_site: CookieSameSite,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>) -> AuthResult<Self> {
        let name = name.into();
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.');
        if !valid {
            return Err(AuthError::InvalidCookie(format!(
                "invalid cookie name '{name}'"
            )));
        }

        Ok(Self {
            name,
            secure: false,
            same_site: CookieSameSite::Lax,
        })
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_same_site(mut self, same_site: CookieSameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn same_site(&self) -> CookieSameSite {
        self.same_site
    }

    // Browsers drop SameSite=None cookies without Secure.
    fn is_secure(&self) -> bool {
        self.secure || self.same_site == CookieSameSite::None
    }

    /// `Set-Cookie` value storing `token` for `max_age_seconds`.
    pub fn issue(&self, token: &str, max_age_seconds: i64) -> AuthResult<HeaderValue> {
        self.render(token, max_age_seconds.max(0))
    }

    /// `Set-Cookie` value that removes the session.
    pub fn clear(&self) -> AuthResult<HeaderValue> {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: i64) -> AuthResult<HeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite={}; Max-Age={}",
            self.name,
            value,
            self.same_site.as_str(),
            max_age
        );
        if self.is_secure() {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).map_err(|err| AuthError::InvalidCookie(err.to_string()))
    }

    /// Reads the session token from the request's `Cookie` headers.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.name && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_owned())
    }
}
