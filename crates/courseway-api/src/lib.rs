//! The courseway request gate and API handlers.
//!
//! Every inbound request runs through three stages, in order, with the
//! first failure short-circuiting the rest:
//!
//! 1. **Rate limit** - a per-client-IP token bucket; an empty bucket is a
//!    429. The bucket store failing open is deliberate: infrastructure
//!    outages must not block all traffic.
//! 2. **Authenticate** - the Bearer credential is verified (signature,
//!    strict expiry) and its subject re-resolved against the user store.
//!    Failures are 401s; a store outage here is a 500, not a bypass.
//! 3. **Authorize** - the declarative [`policy::Policy`] rule table
//!    decides per action. Missing resources are 404s for every caller;
//!    role and ownership denials are 403s.
//!
//! Handlers only run once all three stages pass.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod policy;
pub mod router;
pub mod token;

pub use error::ApiError;
pub use identity::Identity;
pub use middleware::{
    Admission, BucketState, BucketStore, CredentialVerifier, InMemoryBucketStore, RateLimitConfig,
    RateLimiter,
};
pub use policy::{Action, Decision, DenyReason, Policy};
pub use router::{api_router, ApiState};
pub use token::TokenIssuer;
