//! Credential handling for courseway.
//!
//! This crate provides:
//! - Signed bearer credentials (HS256 JWTs) with a strict expiry check
//! - Argon2id password hashing with OWASP-recommended parameters
//!
//! # Example
//!
//! ```rust,ignore
//! use courseway_auth::{encode_token, decode_token, JwtClaims, hash_password, verify_password};
//! use courseway_core::{Role, UserId};
//!
//! let claims = JwtClaims::builder()
//!     .subject(UserId::new())
//!     .email("ada@example.edu")
//!     .role(Role::Instructor)
//!     .expires_in_secs(86_400)
//!     .build();
//!
//! let token = encode_token(&claims, b"server-secret")?;
//! let decoded = decode_token(&token, b"server-secret")?;
//!
//! let hash = hash_password("my-secure-password")?;
//! let is_valid = verify_password("my-secure-password", &hash)?;
//! ```

mod claims;
mod error;
mod jwt;
mod password;

pub use claims::{JwtClaims, JwtClaimsBuilder};
pub use error::AuthError;
pub use jwt::{decode_token, decode_token_with_config, encode_token, ValidationConfig};
pub use password::{hash_password, verify_password, PasswordHasher};
