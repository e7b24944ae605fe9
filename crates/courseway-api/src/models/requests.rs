//! Request bodies and query parameters.
//!
//! Bodies use the `validator` derive; handlers call `.validate()` before
//! touching any store and map violations to 400 responses. Field names
//! follow the API's camelCase wire format.

use chrono::{DateTime, Utc};
use courseway_core::{CourseId, Role, UserId};
use courseway_store::{AssignmentUpdate, CourseFilter, CourseUpdate};
use serde::Deserialize;
use validator::Validate;

/// Body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub password: String,
    pub role: Role,
}

/// Body for `POST /users/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Body for `POST /courses`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub subject: String,
    #[validate(length(min = 1, max = 16, message = "must be 1-16 characters"))]
    pub number: String,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 32, message = "must be 1-32 characters"))]
    pub term: String,
    pub instructor_id: UserId,
}

/// Body for `PATCH /courses/{id}`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 16, message = "must be 1-16 characters"))]
    pub number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 32, message = "must be 1-32 characters"))]
    pub term: Option<String>,
    pub instructor_id: Option<UserId>,
}

impl From<UpdateCourseRequest> for CourseUpdate {
    fn from(req: UpdateCourseRequest) -> Self {
        CourseUpdate {
            subject: req.subject,
            number: req.number,
            title: req.title,
            term: req.term,
            instructor_id: req.instructor_id,
        }
    }
}

/// Body for `POST /courses/{id}/students`.
///
/// At least one of `add`/`remove` must be present.
#[derive(Debug, Deserialize)]
pub struct EnrollmentUpdateRequest {
    pub add: Option<Vec<UserId>>,
    pub remove: Option<Vec<UserId>>,
}

impl EnrollmentUpdateRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_none() && self.remove.is_none()
    }
}

/// Body for `POST /assignments`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: String,
    pub points: u32,
    pub due: DateTime<Utc>,
}

/// Body for `PATCH /assignments/{id}`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: Option<String>,
    pub points: Option<u32>,
    pub due: Option<DateTime<Utc>>,
}

impl From<UpdateAssignmentRequest> for AssignmentUpdate {
    fn from(req: UpdateAssignmentRequest) -> Self {
        AssignmentUpdate {
            title: req.title,
            points: req.points,
            due: req.due,
        }
    }
}

/// Query parameters for `GET /courses`.
#[derive(Debug, Deserialize, Default)]
pub struct CourseListQuery {
    pub page: Option<usize>,
    pub subject: Option<String>,
    pub number: Option<String>,
    pub term: Option<String>,
}

impl CourseListQuery {
    #[must_use]
    pub fn filter(&self) -> CourseFilter {
        CourseFilter {
            subject: self.subject.clone(),
            number: self.number.clone(),
            term: self.term.clone(),
        }
    }
}

/// Bare page query parameter for paginated listings.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<usize>,
}
