//! Application state construction.

use courseway_api::ApiState;
use courseway_store::{
    InMemoryAssignmentStore, InMemoryCourseStore, InMemorySubmissionStore, InMemoryUserStore,
};
use std::sync::Arc;

use crate::config::Config;

/// Build the API state over the in-memory reference stores.
///
/// A deployment backed by a real document store would construct its own
/// implementations of the store traits here; nothing else changes.
pub fn build_state(config: &Config) -> ApiState {
    ApiState::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryCourseStore::new()),
        Arc::new(InMemoryAssignmentStore::new()),
        Arc::new(InMemorySubmissionStore::new()),
        &config.jwt_secret,
        config.token_ttl_secs,
        config.rate_limit.clone(),
    )
}
