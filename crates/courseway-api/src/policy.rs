//! The authorization policy, the third gate stage.
//!
//! One declarative rule table instead of per-route conditionals: every
//! protected operation is an [`Action`], and [`Policy::authorize`] turns
//! an identity + action pair into a [`Decision`].
//!
//! Ordering invariant: existence is checked before any role or ownership
//! check. A missing course, assignment or submission yields
//! `ResourceNotFound` for every caller, admin included, so responses never
//! leak existence information inconsistently. The admin override applies
//! only after the target is known to exist.

use courseway_core::{AssignmentId, CourseId, Role, SubmissionId, UserId};
use courseway_store::{
    AssignmentStore, Course, CourseStore, StoreError, SubmissionStore,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::identity::Identity;

/// A protected operation and its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateCourse,
    UpdateCourse(CourseId),
    DeleteCourse(CourseId),
    ViewEnrollment(CourseId),
    UpdateEnrollment(CourseId),
    CreateAssignment(CourseId),
    UpdateAssignment(AssignmentId),
    DeleteAssignment(AssignmentId),
    ListSubmissions(AssignmentId),
    CreateSubmission(AssignmentId),
    DownloadSubmission(SubmissionId),
    ViewUser(UserId),
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The caller's role can never perform this action.
    WrongRole,
    /// The caller's role could, but this resource belongs to someone else.
    NotOwner,
    /// The student is not enrolled in the owning course.
    NotEnrolled,
    /// The target (or its parent) does not exist.
    ResourceNotFound,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Resource-specific authorization rules over the injected stores.
pub struct Policy {
    courses: Arc<dyn CourseStore>,
    assignments: Arc<dyn AssignmentStore>,
    submissions: Arc<dyn SubmissionStore>,
}

impl Policy {
    pub fn new(
        courses: Arc<dyn CourseStore>,
        assignments: Arc<dyn AssignmentStore>,
        submissions: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            courses,
            assignments,
            submissions,
        }
    }

    /// Evaluate the rule for `action` against `identity`.
    ///
    /// # Errors
    ///
    /// Propagates `StoreError` when a resource lookup fails; authorization
    /// fails closed on infrastructure errors.
    pub async fn authorize(
        &self,
        identity: &Identity,
        action: Action,
    ) -> Result<Decision, StoreError> {
        match action {
            Action::CreateCourse => Ok(if identity.is_admin() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::WrongRole)
            }),

            Action::UpdateCourse(id)
            | Action::DeleteCourse(id)
            | Action::ViewEnrollment(id)
            | Action::UpdateEnrollment(id)
            | Action::CreateAssignment(id) => {
                let Some(course) = self.courses.find_by_id(id).await? else {
                    return Ok(Decision::Deny(DenyReason::ResourceNotFound));
                };
                Ok(instructor_rule(identity, &course))
            }

            Action::UpdateAssignment(id)
            | Action::DeleteAssignment(id)
            | Action::ListSubmissions(id) => {
                let Some(course) = self.owning_course(id).await? else {
                    return Ok(Decision::Deny(DenyReason::ResourceNotFound));
                };
                Ok(instructor_rule(identity, &course))
            }

            Action::CreateSubmission(id) => {
                let Some(course) = self.owning_course(id).await? else {
                    return Ok(Decision::Deny(DenyReason::ResourceNotFound));
                };
                Ok(match identity.role {
                    Role::Admin => Decision::Allow,
                    Role::Student if course.is_enrolled(identity.id) => Decision::Allow,
                    Role::Student => Decision::Deny(DenyReason::NotEnrolled),
                    Role::Instructor => Decision::Deny(DenyReason::WrongRole),
                })
            }

            Action::DownloadSubmission(id) => {
                let Some(submission) = self.submissions.find_by_id(id).await? else {
                    return Ok(Decision::Deny(DenyReason::ResourceNotFound));
                };
                match identity.role {
                    Role::Admin => Ok(Decision::Allow),
                    Role::Student => Ok(if submission.student_id == identity.id {
                        Decision::Allow
                    } else {
                        Decision::Deny(DenyReason::NotOwner)
                    }),
                    Role::Instructor => {
                        let Some(course) =
                            self.owning_course(submission.assignment_id).await?
                        else {
                            return Ok(Decision::Deny(DenyReason::ResourceNotFound));
                        };
                        Ok(if course.instructor_id == identity.id {
                            Decision::Allow
                        } else {
                            Decision::Deny(DenyReason::NotOwner)
                        })
                    }
                }
            }

            Action::ViewUser(id) => Ok(if identity.is_admin() || identity.id == id {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }),
        }
    }

    /// Authorize and translate a denial into the HTTP-facing error.
    ///
    /// `resource` names the entity reported on a `ResourceNotFound` denial.
    pub async fn require(
        &self,
        identity: &Identity,
        action: Action,
        resource: &'static str,
    ) -> Result<(), ApiError> {
        match self.authorize(identity, action).await? {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(ApiError::from_denial(reason, resource)),
        }
    }

    /// Resolve an assignment to its owning course.
    async fn owning_course(&self, id: AssignmentId) -> Result<Option<Course>, StoreError> {
        let Some(assignment) = self.assignments.find_by_id(id).await? else {
            return Ok(None);
        };
        self.courses.find_by_id(assignment.course_id).await
    }
}

/// The shared rule for instructor-scoped course operations: admin always,
/// the owning instructor, everyone else denied by role or ownership.
fn instructor_rule(identity: &Identity, course: &Course) -> Decision {
    match identity.role {
        Role::Admin => Decision::Allow,
        Role::Instructor if course.instructor_id == identity.id => Decision::Allow,
        Role::Instructor => Decision::Deny(DenyReason::NotOwner),
        Role::Student => Decision::Deny(DenyReason::WrongRole),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courseway_store::{
        Assignment, InMemoryAssignmentStore, InMemoryCourseStore, InMemorySubmissionStore,
        Submission,
    };

    struct Fixture {
        policy: Policy,
        courses: Arc<InMemoryCourseStore>,
        assignments: Arc<InMemoryAssignmentStore>,
        submissions: Arc<InMemorySubmissionStore>,
    }

    fn fixture() -> Fixture {
        let courses = Arc::new(InMemoryCourseStore::new());
        let assignments = Arc::new(InMemoryAssignmentStore::new());
        let submissions = Arc::new(InMemorySubmissionStore::new());
        let policy = Policy::new(
            courses.clone(),
            assignments.clone(),
            submissions.clone(),
        );
        Fixture {
            policy,
            courses,
            assignments,
            submissions,
        }
    }

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new(),
            email: format!("{role}@example.edu"),
            role,
        }
    }

    fn course_of(instructor: UserId) -> Course {
        Course {
            id: CourseId::new(),
            subject: "CS".to_string(),
            number: "493".to_string(),
            title: "Cloud Application Development".to_string(),
            term: "sp26".to_string(),
            instructor_id: instructor,
            students: Vec::new(),
        }
    }

    fn assignment_of(course_id: CourseId) -> Assignment {
        Assignment {
            id: AssignmentId::new(),
            course_id,
            title: "Homework 1".to_string(),
            points: 100,
            due: Utc::now(),
        }
    }

    fn submission_of(assignment_id: AssignmentId, student_id: UserId) -> Submission {
        Submission {
            id: SubmissionId::new(),
            assignment_id,
            student_id,
            submitted_at: Utc::now(),
            grade: None,
            filename: "hw1.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_course_admin_only() {
        let f = fixture();

        let decision = f
            .policy
            .authorize(&identity(Role::Admin), Action::CreateCourse)
            .await
            .unwrap();
        assert!(decision.is_allowed());

        for role in [Role::Instructor, Role::Student] {
            let decision = f
                .policy
                .authorize(&identity(role), Action::CreateCourse)
                .await
                .unwrap();
            assert_eq!(decision, Decision::Deny(DenyReason::WrongRole));
        }
    }

    #[tokio::test]
    async fn test_update_course_ownership() {
        let f = fixture();
        let owner = identity(Role::Instructor);
        let rival = identity(Role::Instructor);
        let course = course_of(owner.id);
        let course_id = course.id;
        f.courses.insert(course).await.unwrap();

        assert!(f
            .policy
            .authorize(&owner, Action::UpdateCourse(course_id))
            .await
            .unwrap()
            .is_allowed());

        assert_eq!(
            f.policy
                .authorize(&rival, Action::UpdateCourse(course_id))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::NotOwner)
        );

        assert!(f
            .policy
            .authorize(&identity(Role::Admin), Action::UpdateCourse(course_id))
            .await
            .unwrap()
            .is_allowed());

        assert_eq!(
            f.policy
                .authorize(&identity(Role::Student), Action::UpdateCourse(course_id))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::WrongRole)
        );
    }

    #[tokio::test]
    async fn test_missing_course_is_not_found_for_every_role() {
        let f = fixture();
        let ghost = CourseId::new();

        for role in [Role::Admin, Role::Instructor, Role::Student] {
            let decision = f
                .policy
                .authorize(&identity(role), Action::UpdateCourse(ghost))
                .await
                .unwrap();
            assert_eq!(decision, Decision::Deny(DenyReason::ResourceNotFound));
        }
    }

    #[tokio::test]
    async fn test_assignment_actions_resolve_owning_course() {
        let f = fixture();
        let owner = identity(Role::Instructor);
        let rival = identity(Role::Instructor);
        let course = course_of(owner.id);
        let assignment = assignment_of(course.id);
        let assignment_id = assignment.id;
        f.courses.insert(course).await.unwrap();
        f.assignments.insert(assignment).await.unwrap();

        assert!(f
            .policy
            .authorize(&owner, Action::UpdateAssignment(assignment_id))
            .await
            .unwrap()
            .is_allowed());

        assert_eq!(
            f.policy
                .authorize(&rival, Action::ListSubmissions(assignment_id))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::NotOwner)
        );

        // Unknown assignment: not found, never a role denial.
        assert_eq!(
            f.policy
                .authorize(&rival, Action::DeleteAssignment(AssignmentId::new()))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::ResourceNotFound)
        );
    }

    #[tokio::test]
    async fn test_create_submission_requires_enrollment() {
        let f = fixture();
        let instructor = identity(Role::Instructor);
        let student = identity(Role::Student);
        let mut course = course_of(instructor.id);
        let course_id = course.id;
        let assignment = assignment_of(course_id);
        let assignment_id = assignment.id;
        f.courses.insert(course.clone()).await.unwrap();
        f.assignments.insert(assignment).await.unwrap();

        // Not enrolled yet.
        assert_eq!(
            f.policy
                .authorize(&student, Action::CreateSubmission(assignment_id))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::NotEnrolled)
        );

        // Enroll and repeat: allowed.
        course.students.push(student.id);
        f.courses
            .set_students(course_id, course.students.clone())
            .await
            .unwrap();
        assert!(f
            .policy
            .authorize(&student, Action::CreateSubmission(assignment_id))
            .await
            .unwrap()
            .is_allowed());

        // Instructors do not submit.
        assert_eq!(
            f.policy
                .authorize(&instructor, Action::CreateSubmission(assignment_id))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::WrongRole)
        );
    }

    #[tokio::test]
    async fn test_download_submission_rules() {
        let f = fixture();
        let instructor = identity(Role::Instructor);
        let owner = identity(Role::Student);
        let other_student = identity(Role::Student);
        let other_instructor = identity(Role::Instructor);

        let course = course_of(instructor.id);
        let assignment = assignment_of(course.id);
        let submission = submission_of(assignment.id, owner.id);
        let submission_id = submission.id;
        f.courses.insert(course).await.unwrap();
        f.assignments.insert(assignment).await.unwrap();
        f.submissions.insert(submission, Vec::new()).await.unwrap();

        assert!(f
            .policy
            .authorize(&owner, Action::DownloadSubmission(submission_id))
            .await
            .unwrap()
            .is_allowed());
        assert!(f
            .policy
            .authorize(&instructor, Action::DownloadSubmission(submission_id))
            .await
            .unwrap()
            .is_allowed());
        assert!(f
            .policy
            .authorize(&identity(Role::Admin), Action::DownloadSubmission(submission_id))
            .await
            .unwrap()
            .is_allowed());

        assert_eq!(
            f.policy
                .authorize(&other_student, Action::DownloadSubmission(submission_id))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::NotOwner)
        );
        assert_eq!(
            f.policy
                .authorize(&other_instructor, Action::DownloadSubmission(submission_id))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[tokio::test]
    async fn test_view_user_self_or_admin() {
        let f = fixture();
        let me = identity(Role::Student);
        let someone_else = UserId::new();

        assert!(f
            .policy
            .authorize(&me, Action::ViewUser(me.id))
            .await
            .unwrap()
            .is_allowed());
        assert!(f
            .policy
            .authorize(&identity(Role::Admin), Action::ViewUser(someone_else))
            .await
            .unwrap()
            .is_allowed());
        assert_eq!(
            f.policy
                .authorize(&me, Action::ViewUser(someone_else))
                .await
                .unwrap(),
            Decision::Deny(DenyReason::NotOwner)
        );
    }
}
