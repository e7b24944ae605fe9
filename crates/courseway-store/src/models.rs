//! Domain records held by the storage collaborators.

use chrono::{DateTime, Utc};
use courseway_core::{AssignmentId, CourseId, Role, SubmissionId, UserId};

/// A user account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// PHC-formatted Argon2id hash. Never leaves the store layer.
    pub password_hash: String,
    pub role: Role,
}

/// A course, including its enrollment.
///
/// `students` has set semantics: enrollment updates de-duplicate on write.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: CourseId,
    pub subject: String,
    pub number: String,
    pub title: String,
    pub term: String,
    pub instructor_id: UserId,
    pub students: Vec<UserId>,
}

impl Course {
    /// Whether the given student is enrolled.
    #[must_use]
    pub fn is_enrolled(&self, student: UserId) -> bool {
        self.students.contains(&student)
    }
}

/// Partial update for a course. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub subject: Option<String>,
    pub number: Option<String>,
    pub title: Option<String>,
    pub term: Option<String>,
    pub instructor_id: Option<UserId>,
}

impl CourseUpdate {
    /// Whether this update changes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.number.is_none()
            && self.title.is_none()
            && self.term.is_none()
            && self.instructor_id.is_none()
    }

    /// Apply the update to a course record.
    pub fn apply(&self, course: &mut Course) {
        if let Some(subject) = &self.subject {
            course.subject = subject.clone();
        }
        if let Some(number) = &self.number {
            course.number = number.clone();
        }
        if let Some(title) = &self.title {
            course.title = title.clone();
        }
        if let Some(term) = &self.term {
            course.term = term.clone();
        }
        if let Some(instructor_id) = self.instructor_id {
            course.instructor_id = instructor_id;
        }
    }
}

/// Filter for course listings. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub subject: Option<String>,
    pub number: Option<String>,
    pub term: Option<String>,
}

impl CourseFilter {
    /// Whether a course matches the filter.
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        self.subject.as_ref().is_none_or(|s| &course.subject == s)
            && self.number.as_ref().is_none_or(|n| &course.number == n)
            && self.term.as_ref().is_none_or(|t| &course.term == t)
    }
}

/// An assignment belonging to a course.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub course_id: CourseId,
    pub title: String,
    pub points: u32,
    pub due: DateTime<Utc>,
}

/// Partial update for an assignment. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub points: Option<u32>,
    pub due: Option<DateTime<Utc>>,
}

impl AssignmentUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.points.is_none() && self.due.is_none()
    }

    pub fn apply(&self, assignment: &mut Assignment) {
        if let Some(title) = &self.title {
            assignment.title = title.clone();
        }
        if let Some(points) = self.points {
            assignment.points = points;
        }
        if let Some(due) = self.due {
            assignment.due = due;
        }
    }
}

/// Metadata for an uploaded submission. The file bytes live in blob
/// storage next to this record.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<f64>,
    pub filename: String,
    pub content_type: String,
}
