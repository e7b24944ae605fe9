//! Storage collaborators for courseway.
//!
//! The API core never talks to a database directly; it goes through the
//! narrow async traits defined here. The in-memory backends are the
//! reference implementations used by the server binary and the test
//! suites; a real deployment would put a document store behind the same
//! traits.

mod error;
mod memory;
mod models;
mod traits;

pub use error::StoreError;
pub use memory::{
    InMemoryAssignmentStore, InMemoryCourseStore, InMemorySubmissionStore, InMemoryUserStore,
};
pub use models::{
    Assignment, AssignmentUpdate, Course, CourseFilter, CourseUpdate, Submission, User,
};
pub use traits::{AssignmentStore, CourseStore, SubmissionStore, UserStore};
