//! Response bodies, in the API's camelCase wire format.

use chrono::{DateTime, Utc};
use courseway_core::{AssignmentId, CourseId, Role, SubmissionId, UserId};
use courseway_store::{Assignment, Course, Submission, User};
use serde::Serialize;

use crate::pagination::Paged;

/// `{"id": ...}` envelope for creation responses.
#[derive(Debug, Serialize)]
pub struct Created<T: Serialize> {
    pub id: T,
}

/// A user profile, without the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: i64,
}

/// Course metadata. Enrollment is deliberately excluded; it has its own
/// endpoint with stricter authorization.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: CourseId,
    pub subject: String,
    pub number: String,
    pub title: String,
    pub term: String,
    pub instructor_id: UserId,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            subject: course.subject,
            number: course.number,
            title: course.title,
            term: course.term,
            instructor_id: course.instructor_id,
        }
    }
}

/// Paginated course listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponse {
    pub courses: Vec<CourseResponse>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_count: usize,
}

impl From<Paged<Course>> for CourseListResponse {
    fn from(paged: Paged<Course>) -> Self {
        Self {
            courses: paged.items.into_iter().map(CourseResponse::from).collect(),
            page: paged.page,
            total_pages: paged.total_pages,
            page_size: paged.page_size,
            total_count: paged.total_count,
        }
    }
}

/// Assignment metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: AssignmentId,
    pub course_id: CourseId,
    pub title: String,
    pub points: u32,
    pub due: DateTime<Utc>,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            course_id: assignment.course_id,
            title: assignment.title,
            points: assignment.points,
            due: assignment.due,
        }
    }
}

/// Assignment paths for a course.
#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<String>,
}

/// Submission metadata plus its download path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
    pub file: String,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        let file = format!("/submissions/{}/file", submission.id);
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            submitted_at: submission.submitted_at,
            grade: submission.grade,
            file,
        }
    }
}

/// Paginated submission listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionResponse>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_count: usize,
}

impl From<Paged<Submission>> for SubmissionListResponse {
    fn from(paged: Paged<Submission>) -> Self {
        Self {
            submissions: paged
                .items
                .into_iter()
                .map(SubmissionResponse::from)
                .collect(),
            page: paged.page,
            total_pages: paged.total_pages,
            page_size: paged.page_size,
            total_count: paged.total_count,
        }
    }
}

/// Links returned when a submission is created.
#[derive(Debug, Serialize)]
pub struct SubmissionLinks {
    pub download: String,
    pub assignment: String,
}

/// `201` body for a new submission.
#[derive(Debug, Serialize)]
pub struct SubmissionCreatedResponse {
    pub id: SubmissionId,
    pub links: SubmissionLinks,
}

impl SubmissionCreatedResponse {
    #[must_use]
    pub fn new(id: SubmissionId, assignment_id: AssignmentId) -> Self {
        Self {
            id,
            links: SubmissionLinks {
                download: format!("/submissions/{id}/file"),
                assignment: format!("/assignments/{assignment_id}"),
            },
        }
    }
}
