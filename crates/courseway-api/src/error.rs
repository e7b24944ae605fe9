//! Error types for the courseway API.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use courseway_auth::AuthError;
use courseway_store::StoreError;
use serde::Serialize;

use crate::policy::DenyReason;

/// Error type covering every terminal outcome of the request gate and the
/// business handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client exceeded its rate limit. Recoverable by waiting.
    #[error("too many requests")]
    Throttled { retry_after_secs: u64 },

    /// Credential missing, invalid, expired, or its subject is gone.
    #[error(transparent)]
    Unauthorized(AuthError),

    /// Authenticated, but the action is denied for this identity.
    #[error("{0}")]
    Forbidden(&'static str),

    /// The target resource does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(&'static str),

    /// Request body failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Infrastructure failure. The string is logged, never exposed.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// Translate an authorization denial into the HTTP-facing error.
    ///
    /// `resource` names the entity reported when the denial is about a
    /// missing parent (e.g. "Course").
    #[must_use]
    pub fn from_denial(reason: DenyReason, resource: &'static str) -> Self {
        match reason {
            DenyReason::ResourceNotFound => ApiError::NotFound(resource),
            DenyReason::WrongRole => ApiError::Forbidden("role does not permit this operation"),
            DenyReason::NotOwner => ApiError::Forbidden("not the owner of this resource"),
            DenyReason::NotEnrolled => ApiError::Forbidden("not enrolled in this course"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::Conflict("email already registered"),
            StoreError::Unavailable(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), |m| format!("{field}: {m}"))
                })
            })
            .collect();
        ApiError::Validation(details.join(", "))
    }
}

/// RFC 7807 Problem Details response format.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn problem(kind: &str, title: &str, status: StatusCode, detail: impl Into<String>) -> ProblemDetails {
    ProblemDetails {
        problem_type: format!("https://courseway.dev/problems/{kind}"),
        title: title.to_string(),
        status: status.as_u16(),
        detail: Some(detail.into()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Throttled { retry_after_secs } => {
                let body = problem(
                    "rate-limit-exceeded",
                    "Too Many Requests",
                    StatusCode::TOO_MANY_REQUESTS,
                    format!("Rate limit exceeded. Try again in {retry_after_secs} seconds."),
                );
                let mut response =
                    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                if let Ok(value) = retry_after_secs.to_string().parse() {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                return response;
            }
            ApiError::Unauthorized(err) => (
                StatusCode::UNAUTHORIZED,
                problem(
                    "unauthorized",
                    "Unauthorized",
                    StatusCode::UNAUTHORIZED,
                    err.to_string(),
                ),
            ),
            ApiError::Forbidden(detail) => (
                StatusCode::FORBIDDEN,
                problem("forbidden", "Forbidden", StatusCode::FORBIDDEN, *detail),
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                problem(
                    "not-found",
                    "Not Found",
                    StatusCode::NOT_FOUND,
                    format!("{resource} not found"),
                ),
            ),
            ApiError::Conflict(detail) => (
                StatusCode::CONFLICT,
                problem("conflict", "Conflict", StatusCode::CONFLICT, *detail),
            ),
            ApiError::Validation(detail) => (
                StatusCode::BAD_REQUEST,
                problem(
                    "validation-error",
                    "Validation Error",
                    StatusCode::BAD_REQUEST,
                    detail.clone(),
                ),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    problem(
                        "internal-error",
                        "Internal Server Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred",
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
