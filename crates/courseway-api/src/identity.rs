//! The per-request caller identity.

use courseway_core::{Role, UserId};

/// Identity resolved from a verified credential.
///
/// Reconstructed on every request by the credential verifier and attached
/// to request extensions; never persisted. The role reflects the user
/// store at verification time, not the credential's embedded claim.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Whether this caller bypasses ownership and enrollment checks.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
