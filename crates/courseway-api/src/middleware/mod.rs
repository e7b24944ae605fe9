//! Gate-stage middleware: rate limiting, then authentication.

pub mod auth;
pub mod rate_limit;

pub use auth::{optional_auth, require_auth, CredentialVerifier};
pub use rate_limit::{
    rate_limit_middleware, Admission, BucketState, BucketStore, InMemoryBucketStore,
    RateLimitConfig, RateLimiter,
};
