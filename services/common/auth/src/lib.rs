pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod failure;
pub mod session;
pub mod verifier;

pub use claims::Claims;
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use extractors::{AuthContext, AuthScheme};
pub use failure::{inspect_failure, FailureAnnotations, TOKEN_EXPIRED_HEADER};
pub use session::{CookieSameSite, SessionCookie};
pub use verifier::JwtVerifier;
