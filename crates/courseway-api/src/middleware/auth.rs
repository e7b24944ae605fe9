//! Credential verification, the second gate stage.
//!
//! Extracts the Bearer credential from the Authorization header, checks
//! signature and expiry, then resolves the embedded subject against the
//! user store. The role is taken from the store, not the credential, so a
//! role change after issuance takes effect immediately. On success an
//! [`Identity`] is attached to the request extensions.

use axum::{
    body::Body,
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};
use courseway_auth::{decode_token, AuthError};
use courseway_store::UserStore;
use std::sync::Arc;

use crate::error::ApiError;
use crate::identity::Identity;

/// Resolves raw bearer credentials to caller identities.
pub struct CredentialVerifier {
    secret: Vec<u8>,
    users: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(secret: impl Into<Vec<u8>>, users: Arc<dyn UserStore>) -> Self {
        Self {
            secret: secret.into(),
            users,
        }
    }

    /// Verify a raw credential and resolve its subject.
    ///
    /// # Errors
    ///
    /// - `ApiError::Unauthorized` for any credential failure (malformed,
    ///   bad signature, expired, unknown subject)
    /// - `ApiError::Internal` when the user store is unreachable; subject
    ///   resolution fails closed
    pub async fn verify(&self, raw: &str) -> Result<Identity, ApiError> {
        let claims = decode_token(raw, &self.secret).map_err(ApiError::Unauthorized)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(ApiError::Unauthorized(AuthError::UnknownSubject))?;

        Ok(Identity {
            id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}

/// Pull the Bearer token out of the Authorization header.
fn bearer_token(request: &Request<Body>) -> Result<&str, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized(AuthError::MissingCredential))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized(AuthError::MissingCredential))?;

    if token.is_empty() {
        return Err(ApiError::Unauthorized(AuthError::MissingCredential));
    }

    Ok(token)
}

/// Middleware requiring a verified credential.
pub async fn require_auth(
    Extension(verifier): Extension<Arc<CredentialVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?;
    let identity = verifier.verify(token).await.inspect_err(|e| {
        tracing::debug!(error = %e, "credential rejected");
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Middleware for routes that accept anonymous callers but grant more to
/// authenticated ones. A present-but-invalid credential is still rejected.
pub async fn optional_auth(
    Extension(verifier): Extension<Arc<CredentialVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.headers().get(AUTHORIZATION).is_some() {
        let token = bearer_token(&request)?;
        let identity = verifier.verify(token).await?;
        request.extensions_mut().insert(identity);
    }

    Ok(next.run(request).await)
}
