//! Async collaborator interfaces.
//!
//! These traits are the seam between the request-gating core and the
//! storage layer. They are intentionally narrow: only the point reads and
//! writes the API actually performs. All of them are object-safe so they
//! can be injected as `Arc<dyn ...>` at construction time.

use crate::error::StoreError;
use crate::models::{
    Assignment, AssignmentUpdate, Course, CourseFilter, CourseUpdate, Submission, User,
};
use async_trait::async_trait;
use courseway_core::{AssignmentId, CourseId, SubmissionId, UserId};

/// User account lookups and creation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` when the email is
    /// already registered.
    async fn insert(&self, user: User) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Course records and enrollment.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn insert(&self, course: Course) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, StoreError>;

    /// Apply a partial update. Returns `false` when the course is absent.
    async fn update(&self, id: CourseId, update: CourseUpdate) -> Result<bool, StoreError>;

    /// Replace the enrollment set. Returns `false` when the course is absent.
    async fn set_students(&self, id: CourseId, students: Vec<UserId>)
        -> Result<bool, StoreError>;

    /// Delete the course. Returns `false` when the course is absent.
    async fn delete(&self, id: CourseId) -> Result<bool, StoreError>;

    /// All courses matching the filter, in insertion order.
    async fn list(&self, filter: &CourseFilter) -> Result<Vec<Course>, StoreError>;
}

/// Assignment records.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn insert(&self, assignment: Assignment) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: AssignmentId) -> Result<Option<Assignment>, StoreError>;

    /// Apply a partial update. Returns `false` when the assignment is absent.
    async fn update(&self, id: AssignmentId, update: AssignmentUpdate)
        -> Result<bool, StoreError>;

    /// Delete the assignment. Returns `false` when absent.
    async fn delete(&self, id: AssignmentId) -> Result<bool, StoreError>;

    async fn list_by_course(&self, course_id: CourseId) -> Result<Vec<Assignment>, StoreError>;

    /// Delete every assignment of a course. Returns the number removed.
    async fn delete_by_course(&self, course_id: CourseId) -> Result<usize, StoreError>;
}

/// Submission metadata plus the uploaded file bytes.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store a submission record together with its file contents.
    async fn insert(&self, submission: Submission, data: Vec<u8>) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, StoreError>;

    /// Fetch a submission together with its stored bytes.
    async fn read_file(
        &self,
        id: SubmissionId,
    ) -> Result<Option<(Submission, Vec<u8>)>, StoreError>;

    async fn list_by_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Submission>, StoreError>;

    /// Delete every submission of an assignment. Returns the number removed.
    async fn delete_by_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<usize, StoreError>;
}
