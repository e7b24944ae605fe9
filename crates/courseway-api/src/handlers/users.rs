//! User account handlers: signup, login, profile.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use courseway_auth::{hash_password, verify_password, AuthError};
use courseway_core::{Role, UserId};
use courseway_store::{User, UserStore};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::models::{Created, CreateUserRequest, LoginRequest, TokenResponse, UserResponse};
use crate::policy::{Action, Policy};
use crate::token::TokenIssuer;

/// `POST /users` - create a user account.
///
/// Anonymous callers may create student accounts. Creating an admin or
/// instructor account requires an authenticated admin, so this sits behind
/// the optional-auth middleware.
pub async fn create_user(
    Extension(users): Extension<Arc<dyn UserStore>>,
    identity: Option<Extension<Identity>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Created<UserId>>), ApiError> {
    body.validate()?;

    if body.role != Role::Student {
        let is_admin = identity.as_ref().is_some_and(|Extension(i)| i.is_admin());
        if !is_admin {
            return Err(ApiError::Forbidden(
                "admin role required to create privileged accounts",
            ));
        }
    }

    let password_hash =
        hash_password(&body.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = User {
        id: UserId::new(),
        name: body.name,
        email: body.email,
        password_hash,
        role: body.role,
    };
    let id = user.id;
    users.insert(user).await?;

    tracing::info!(user_id = %id, "user created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `POST /users/login` - verify credentials and issue a signed token.
pub async fn login(
    Extension(users): Extension<Arc<dyn UserStore>>,
    Extension(issuer): Extension<TokenIssuer>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    body.validate()?;

    // Unknown email and wrong password produce the same response.
    let Some(user) = users.find_by_email(&body.email).await? else {
        return Err(invalid_credentials());
    };

    let matches = verify_password(&body.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !matches {
        tracing::debug!(user_id = %user.id, "login failed: wrong password");
        return Err(invalid_credentials());
    }

    let (token, expires_in) = issuer
        .issue(&user)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "login successful");
    Ok(Json(TokenResponse { token, expires_in }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized(AuthError::InvalidCredential(
        "invalid email or password".to_string(),
    ))
}

/// `GET /users/{id}` - fetch a user profile. Self or admin.
pub async fn get_user(
    Extension(users): Extension<Arc<dyn UserStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
    policy
        .require(&identity, Action::ViewUser(id), "User")
        .await?;

    let user = users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user.into()))
}
