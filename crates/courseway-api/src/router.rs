//! Route table and gate wiring.
//!
//! The gate stages are strictly ordered by layer nesting: the rate
//! limiter is the outermost layer on every route, authentication applies
//! to the protected subtree, and authorization runs inside handlers
//! (several routes must load the target resource before the policy can
//! decide). The first failing stage short-circuits the rest.

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use courseway_store::{AssignmentStore, CourseStore, SubmissionStore, UserStore};
use std::sync::Arc;

use crate::handlers::{
    create_assignment, create_course, create_submission, create_user, delete_assignment,
    delete_course, download_submission, get_assignment, get_course, get_roster, get_students,
    get_user, list_course_assignments, list_courses, list_submissions, login, update_assignment,
    update_course, update_enrollment,
};
use crate::middleware::{
    optional_auth, rate_limit_middleware, require_auth, CredentialVerifier, RateLimitConfig,
    RateLimiter,
};
use crate::policy::Policy;
use crate::token::TokenIssuer;

/// Everything the API routes need, injected once at startup.
#[derive(Clone)]
pub struct ApiState {
    pub users: Arc<dyn UserStore>,
    pub courses: Arc<dyn CourseStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub policy: Arc<Policy>,
    pub verifier: Arc<CredentialVerifier>,
    pub issuer: TokenIssuer,
    pub limiter: Arc<RateLimiter>,
}

impl ApiState {
    /// Wire up the gate components over the given stores.
    pub fn new(
        users: Arc<dyn UserStore>,
        courses: Arc<dyn CourseStore>,
        assignments: Arc<dyn AssignmentStore>,
        submissions: Arc<dyn SubmissionStore>,
        jwt_secret: &str,
        token_ttl_secs: i64,
        rate_limit: RateLimitConfig,
    ) -> Self {
        let policy = Arc::new(Policy::new(
            courses.clone(),
            assignments.clone(),
            submissions.clone(),
        ));
        let verifier = Arc::new(CredentialVerifier::new(jwt_secret, users.clone()));
        let issuer = TokenIssuer::new(jwt_secret, token_ttl_secs);
        let limiter = Arc::new(RateLimiter::new(rate_limit));

        Self {
            users,
            courses,
            assignments,
            submissions,
            policy,
            verifier,
            issuer,
            limiter,
        }
    }
}

/// Build the API router with all gate stages in place.
pub fn api_router(state: ApiState) -> Router {
    // Routes requiring a verified credential; authorization happens in
    // the handlers via the policy.
    let protected = Router::new()
        .route("/users/:id", get(get_user))
        .route("/courses", post(create_course))
        .route(
            "/courses/:id",
            axum::routing::patch(update_course).delete(delete_course),
        )
        .route(
            "/courses/:id/students",
            get(get_students).post(update_enrollment),
        )
        .route("/courses/:id/roster", get(get_roster))
        .route("/courses/:id/assignments", get(list_course_assignments))
        .route("/assignments", post(create_assignment))
        .route(
            "/assignments/:id",
            get(get_assignment)
                .patch(update_assignment)
                .delete(delete_assignment),
        )
        .route(
            "/assignments/:id/submissions",
            get(list_submissions).post(create_submission),
        )
        .route("/submissions/:id/file", get(download_submission))
        .layer(middleware::from_fn(require_auth));

    // Signup accepts anonymous callers but needs the caller's identity
    // when present to gate privileged roles.
    let signup = Router::new()
        .route("/users", post(create_user))
        .layer(middleware::from_fn(optional_auth));

    // Fully public routes.
    let open = Router::new()
        .route("/users/login", post(login))
        .route("/courses", get(list_courses))
        .route("/courses/:id", get(get_course));

    // Layer order is inside-out: the rate limiter is added after the
    // merge so it wraps every route, and the extensions are added last so
    // every middleware below can extract them.
    Router::new()
        .merge(protected)
        .merge(signup)
        .merge(open)
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(state.users))
        .layer(Extension(state.courses))
        .layer(Extension(state.assignments))
        .layer(Extension(state.submissions))
        .layer(Extension(state.policy))
        .layer(Extension(state.verifier))
        .layer(Extension(state.issuer))
        .layer(Extension(state.limiter))
}
