//! Error type for storage collaborators.

use thiserror::Error;

/// Failures surfaced by the storage traits.
///
/// `Unavailable` is the infrastructure failure case. How it propagates
/// depends on the caller: the rate limiter fails open on it, while
/// credential and authorization lookups fail closed (5xx).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the operation failed.
    #[error("store backend unavailable: {0}")]
    Unavailable(String),

    /// An account with this email already exists.
    #[error("email already registered")]
    DuplicateEmail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            StoreError::Unavailable("connection refused".to_string()).to_string(),
            "store backend unavailable: connection refused"
        );
        assert_eq!(
            StoreError::DuplicateEmail.to_string(),
            "email already registered"
        );
    }
}
