//! Credential encoding and decoding with HS256.
//!
//! Credentials are JWTs signed with a single server secret. Expiry is
//! strict: no clock-skew leeway is applied by default, so a credential
//! whose `exp` has passed always fails verification.

use crate::claims::JwtClaims;
use crate::error::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Configuration for credential validation.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Leeway in seconds for exp validation. Zero by default: expiry is
    /// absolute wall-clock time.
    pub leeway: u64,
    /// Whether to validate expiration.
    pub validate_exp: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            leeway: 0,
            validate_exp: true,
        }
    }
}

impl ValidationConfig {
    /// Create a validation config with a custom leeway.
    #[must_use]
    pub fn with_leeway(leeway: u64) -> Self {
        Self {
            leeway,
            ..Default::default()
        }
    }

    /// Disable expiration validation (use with caution).
    #[must_use]
    pub fn skip_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }
}

/// Encode claims into a signed credential string using HS256.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredential` if encoding fails.
pub fn encode_token(claims: &JwtClaims, secret: &[u8]) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(secret);
    let header = Header::new(Algorithm::HS256);

    encode(&header, claims, &key)
        .map_err(|e| AuthError::InvalidCredential(format!("Encoding failed: {e}")))
}

/// Decode and validate a credential.
///
/// # Errors
///
/// - `AuthError::ExpiredCredential` - the credential's expiry has passed
/// - `AuthError::InvalidCredential` - malformed token or signature mismatch
pub fn decode_token(token: &str, secret: &[u8]) -> Result<JwtClaims, AuthError> {
    decode_token_with_config(token, secret, &ValidationConfig::default())
}

/// Decode and validate a credential with a custom validation config.
pub fn decode_token_with_config(
    token: &str,
    secret: &[u8],
    config: &ValidationConfig,
) -> Result<JwtClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway;
    validation.validate_exp = config.validate_exp;
    validation.algorithms = vec![Algorithm::HS256];

    let token_data = decode::<JwtClaims>(token, &key, &validation).map_err(map_jwt_error)?;

    Ok(token_data.claims)
}

/// Map jsonwebtoken errors onto the credential failure taxonomy.
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
        ErrorKind::InvalidSignature => {
            AuthError::InvalidCredential("Signature mismatch".to_string())
        }
        ErrorKind::InvalidAlgorithm => {
            AuthError::InvalidCredential("Unsupported algorithm".to_string())
        }
        ErrorKind::InvalidToken => AuthError::InvalidCredential("Malformed token".to_string()),
        ErrorKind::Base64(_) => AuthError::InvalidCredential("Invalid base64 encoding".to_string()),
        ErrorKind::Json(_) => AuthError::InvalidCredential("Invalid JSON in claims".to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::InvalidCredential(format!("Missing required claim: {claim}"))
        }
        _ => AuthError::InvalidCredential(format!("Validation failed: {err}")),
    }
}
