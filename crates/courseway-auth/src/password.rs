//! Password hashing with Argon2id.

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

// OWASP-recommended Argon2id cost parameters: 19 MiB of memory, two
// passes, single lane.
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

/// Hashes and verifies passwords using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, None)
            .expect("baseline Argon2 cost parameters are well-formed");
        Self { params }
    }

    /// A hasher with custom cost parameters.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HashingFailed` when the parameters are out of
    /// the range Argon2 accepts.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashingFailed(format!("Invalid parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password, producing a PHC-formatted string with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HashingFailed` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashingFailed(format!("Hashing failed: {e}")))
    }

    /// Check a password against a stored PHC hash. `Ok(false)` means the
    /// password does not match; only an unparseable hash is an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidHashFormat` if the hash is not valid PHC.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidHashFormat)?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Hash a password with the default cost parameters.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    PasswordHasher::new().hash(password)
}

/// Verify a password with the default cost parameters.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    PasswordHasher::new().verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deliberately cheap parameters so the suite stays fast.
    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn produces_phc_formatted_argon2id_hashes() {
        let hash = fast_hasher().hash("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn accepts_the_right_password_and_rejects_the_wrong_one() {
        let hasher = fast_hasher();
        let hash = hasher.hash("hunter2").unwrap();

        assert!(hasher.verify("hunter2", &hash).unwrap());
        assert!(!hasher.verify("hunter3", &hash).unwrap());
    }

    #[test]
    fn unparseable_hash_is_an_error_not_a_mismatch() {
        let result = fast_hasher().verify("hunter2", "not-a-phc-hash");
        assert!(matches!(result.unwrap_err(), AuthError::InvalidHashFormat));
    }

    #[test]
    fn equal_passwords_hash_differently() {
        let hasher = fast_hasher();
        assert_ne!(
            hasher.hash("same-password").unwrap(),
            hasher.hash("same-password").unwrap()
        );
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(PasswordHasher::with_params(1024, 0, 1).is_err());
    }
}
