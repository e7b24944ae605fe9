//! JWT claims carried by courseway credentials.
//!
//! A credential embeds the subject's id, email and role at issuance time,
//! plus the standard `iat`/`exp`/`jti` claims. The role claim is a hint:
//! the request gate re-fetches the current role from the user store on
//! every request, so a stale claim never grants stale privileges.

use chrono::Utc;
use courseway_core::{Role, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a signed courseway credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    /// Subject - the user this credential was issued to.
    pub sub: UserId,

    /// Email address of the subject at issuance time.
    pub email: String,

    /// Role of the subject at issuance time.
    pub role: Role,

    /// Expiration time as Unix timestamp.
    pub exp: i64,

    /// Issued at as Unix timestamp.
    pub iat: i64,

    /// Unique identifier for this credential.
    pub jti: String,
}

impl JwtClaims {
    /// Create a new builder for constructing claims.
    #[must_use]
    pub fn builder() -> JwtClaimsBuilder {
        JwtClaimsBuilder::default()
    }

    /// Check if the credential is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Builder for constructing JWT claims.
#[derive(Debug, Default)]
pub struct JwtClaimsBuilder {
    sub: Option<UserId>,
    email: Option<String>,
    role: Option<Role>,
    exp: Option<i64>,
    iat: Option<i64>,
    jti: Option<String>,
}

impl JwtClaimsBuilder {
    /// Set the subject (user id).
    #[must_use]
    pub fn subject(mut self, sub: UserId) -> Self {
        self.sub = Some(sub);
        self
    }

    /// Set the subject's email.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the subject's role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set expiration time as Unix timestamp.
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set expiration time as seconds from now.
    #[must_use]
    pub fn expires_in_secs(mut self, secs: i64) -> Self {
        self.exp = Some(Utc::now().timestamp() + secs);
        self
    }

    /// Set the issued at time.
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set the credential id.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Build the claims.
    ///
    /// # Defaults
    ///
    /// - `sub`: nil user id if not set
    /// - `role`: `Student` if not set
    /// - `exp`: 24 hours from now if not set
    /// - `iat`: current time if not set
    /// - `jti`: new UUID v4 if not set
    #[must_use]
    pub fn build(self) -> JwtClaims {
        let now = Utc::now().timestamp();

        JwtClaims {
            sub: self.sub.unwrap_or_else(|| UserId::from(Uuid::nil())),
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or(Role::Student),
            exp: self.exp.unwrap_or(now + 86_400),
            iat: self.iat.unwrap_or(now),
            jti: self.jti.unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }
}
