//! Error types for credential operations.

use thiserror::Error;

/// Authentication error types.
///
/// Each variant maps to a specific failure mode, so callers can translate
/// them into precise HTTP responses without string matching.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No credential was presented, or the Bearer scheme prefix is missing.
    #[error("Authentication credential missing")]
    MissingCredential,

    /// The credential is malformed or its signature does not verify.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The credential's expiry is in the past.
    #[error("Credential has expired")]
    ExpiredCredential,

    /// The credential verified but its subject no longer exists.
    #[error("Unknown credential subject")]
    UnknownSubject,

    /// Password hashing operation failed.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Password hash format is invalid.
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

impl AuthError {
    /// Check if this error indicates an expired credential.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::ExpiredCredential)
    }

    /// Check if this error relates to credential verification (as opposed
    /// to password operations).
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredential
                | AuthError::InvalidCredential(_)
                | AuthError::ExpiredCredential
                | AuthError::UnknownSubject
        )
    }
}
