//! Credential issuance for the login endpoint.

use courseway_auth::{encode_token, AuthError, JwtClaims};
use courseway_store::User;
use std::sync::Arc;

/// Issues signed credentials with a fixed validity window.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Arc<Vec<u8>>,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Default credential lifetime: 24 hours.
    pub const DEFAULT_TTL_SECS: i64 = 86_400;

    pub fn new(secret: impl Into<Vec<u8>>, ttl_secs: i64) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            ttl_secs,
        }
    }

    /// Issue a credential for a user. Returns the token and its lifetime
    /// in seconds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<(String, i64), AuthError> {
        let claims = JwtClaims::builder()
            .subject(user.id)
            .email(&user.email)
            .role(user.role)
            .expires_in_secs(self.ttl_secs)
            .build();

        let token = encode_token(&claims, &self.secret)?;
        Ok((token, self.ttl_secs))
    }
}
