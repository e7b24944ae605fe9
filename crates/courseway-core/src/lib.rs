//! Core types shared across courseway crates.
//!
//! Provides strongly-typed identifiers for the domain entities and the
//! fixed role set used by the authorization policy.

mod ids;
mod role;

pub use ids::{AssignmentId, CourseId, ParseIdError, SubmissionId, UserId};
pub use role::Role;
