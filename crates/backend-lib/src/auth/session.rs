// ============================
// openestate-backend-lib/src/auth/session.rs
// ============================
//! Stateless session tokens and the `_token` cookie.
use chrono::Utc;
use cookie::Cookie;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name of the HTTP-only cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "_token";

/// Minimum length for the HS256 signing secret
const MIN_SECRET_LENGTH: usize = 32;

/// Claims embedded in a session token. Downstream request handling reads
/// these without a store lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    /// Display name
    pub name: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
    ttl_secs: u64,
}

impl SessionSigner {
    /// Create a signer. Secrets shorter than 32 characters are rejected.
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Config(format!(
                "session signing secret must be at least {MIN_SECRET_LENGTH} characters"
            )));
        }

        Ok(Self {
            secret: secret.to_string(),
            ttl_secs,
        })
    }

    /// Issue a signed token asserting the given identity
    pub fn issue(&self, user_id: &str, name: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now + self.ttl_secs as i64,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::SessionToken(e.to_string()))
    }

    /// Verify a token signature and expiry, returning its claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::SessionToken(e.to_string()))
    }
}

/// Build the HTTP-only cookie set after a successful login
pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .path("/")
        .build()
}
