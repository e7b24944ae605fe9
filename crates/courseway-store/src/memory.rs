//! In-memory reference implementations of the storage traits.
//!
//! Thread-safe via `parking_lot` locks over plain maps. Insertion order is
//! preserved for listings by keeping a side vector of ids.

use crate::error::StoreError;
use crate::models::{
    Assignment, AssignmentUpdate, Course, CourseFilter, CourseUpdate, Submission, User,
};
use crate::traits::{AssignmentStore, CourseStore, SubmissionStore, UserStore};
use async_trait::async_trait;
use courseway_core::{AssignmentId, CourseId, SubmissionId, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write();
        let email = user.email.to_lowercase();
        if users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }
}

/// In-memory course store.
#[derive(Debug, Default)]
pub struct InMemoryCourseStore {
    courses: RwLock<(Vec<CourseId>, HashMap<CourseId, Course>)>,
}

impl InMemoryCourseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn insert(&self, course: Course) -> Result<(), StoreError> {
        let mut guard = self.courses.write();
        guard.0.push(course.id);
        guard.1.insert(course.id, course);
        Ok(())
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        Ok(self.courses.read().1.get(&id).cloned())
    }

    async fn update(&self, id: CourseId, update: CourseUpdate) -> Result<bool, StoreError> {
        let mut guard = self.courses.write();
        match guard.1.get_mut(&id) {
            Some(course) => {
                update.apply(course);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_students(
        &self,
        id: CourseId,
        students: Vec<UserId>,
    ) -> Result<bool, StoreError> {
        let mut guard = self.courses.write();
        match guard.1.get_mut(&id) {
            Some(course) => {
                course.students = students;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: CourseId) -> Result<bool, StoreError> {
        let mut guard = self.courses.write();
        guard.0.retain(|c| *c != id);
        Ok(guard.1.remove(&id).is_some())
    }

    async fn list(&self, filter: &CourseFilter) -> Result<Vec<Course>, StoreError> {
        let guard = self.courses.read();
        Ok(guard
            .0
            .iter()
            .filter_map(|id| guard.1.get(id))
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }
}

/// In-memory assignment store.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    assignments: RwLock<(Vec<AssignmentId>, HashMap<AssignmentId, Assignment>)>,
}

impl InMemoryAssignmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn insert(&self, assignment: Assignment) -> Result<(), StoreError> {
        let mut guard = self.assignments.write();
        guard.0.push(assignment.id);
        guard.1.insert(assignment.id, assignment);
        Ok(())
    }

    async fn find_by_id(&self, id: AssignmentId) -> Result<Option<Assignment>, StoreError> {
        Ok(self.assignments.read().1.get(&id).cloned())
    }

    async fn update(
        &self,
        id: AssignmentId,
        update: AssignmentUpdate,
    ) -> Result<bool, StoreError> {
        let mut guard = self.assignments.write();
        match guard.1.get_mut(&id) {
            Some(assignment) => {
                update.apply(assignment);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: AssignmentId) -> Result<bool, StoreError> {
        let mut guard = self.assignments.write();
        guard.0.retain(|a| *a != id);
        Ok(guard.1.remove(&id).is_some())
    }

    async fn list_by_course(&self, course_id: CourseId) -> Result<Vec<Assignment>, StoreError> {
        let guard = self.assignments.read();
        Ok(guard
            .0
            .iter()
            .filter_map(|id| guard.1.get(id))
            .filter(|a| a.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn delete_by_course(&self, course_id: CourseId) -> Result<usize, StoreError> {
        let mut guard = self.assignments.write();
        let doomed: Vec<AssignmentId> = guard
            .1
            .values()
            .filter(|a| a.course_id == course_id)
            .map(|a| a.id)
            .collect();
        for id in &doomed {
            guard.1.remove(id);
        }
        guard.0.retain(|id| !doomed.contains(id));
        Ok(doomed.len())
    }
}

/// In-memory submission store. File bytes are held alongside the metadata.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    submissions: RwLock<(
        Vec<SubmissionId>,
        HashMap<SubmissionId, (Submission, Vec<u8>)>,
    )>,
}

impl InMemorySubmissionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert(&self, submission: Submission, data: Vec<u8>) -> Result<(), StoreError> {
        let mut guard = self.submissions.write();
        guard.0.push(submission.id);
        guard.1.insert(submission.id, (submission, data));
        Ok(())
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, StoreError> {
        Ok(self
            .submissions
            .read()
            .1
            .get(&id)
            .map(|(meta, _)| meta.clone()))
    }

    async fn read_file(
        &self,
        id: SubmissionId,
    ) -> Result<Option<(Submission, Vec<u8>)>, StoreError> {
        Ok(self.submissions.read().1.get(&id).cloned())
    }

    async fn list_by_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Submission>, StoreError> {
        let guard = self.submissions.read();
        Ok(guard
            .0
            .iter()
            .filter_map(|id| guard.1.get(id))
            .filter(|(meta, _)| meta.assignment_id == assignment_id)
            .map(|(meta, _)| meta.clone())
            .collect())
    }

    async fn delete_by_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<usize, StoreError> {
        let mut guard = self.submissions.write();
        let doomed: Vec<SubmissionId> = guard
            .1
            .values()
            .filter(|(meta, _)| meta.assignment_id == assignment_id)
            .map(|(meta, _)| meta.id)
            .collect();
        for id in &doomed {
            guard.1.remove(id);
        }
        guard.0.retain(|id| !doomed.contains(id));
        Ok(doomed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courseway_core::Role;

    fn user(email: &str, role: Role) -> User {
        User {
            id: UserId::new(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role,
        }
    }

    fn course(instructor: UserId, subject: &str, term: &str) -> Course {
        Course {
            id: CourseId::new(),
            subject: subject.to_string(),
            number: "493".to_string(),
            title: "Cloud Application Development".to_string(),
            term: term.to_string(),
            instructor_id: instructor,
            students: Vec::new(),
        }
    }

    fn assignment(course_id: CourseId) -> Assignment {
        Assignment {
            id: AssignmentId::new(),
            course_id,
            title: "Homework 1".to_string(),
            points: 100,
            due: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_user_store_duplicate_email_rejected() {
        let store = InMemoryUserStore::new();
        store.insert(user("ada@example.edu", Role::Student)).await.unwrap();

        let result = store.insert(user("Ada@Example.edu", Role::Student)).await;
        assert!(matches!(result.unwrap_err(), StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_user_store_find_by_email_case_insensitive() {
        let store = InMemoryUserStore::new();
        let u = user("grace@example.edu", Role::Instructor);
        let id = u.id;
        store.insert(u).await.unwrap();

        let found = store.find_by_email("GRACE@example.edu").await.unwrap();
        assert_eq!(found.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_course_store_update_and_delete() {
        let store = InMemoryCourseStore::new();
        let c = course(UserId::new(), "CS", "sp26");
        let id = c.id;
        store.insert(c).await.unwrap();

        let updated = store
            .update(
                id,
                CourseUpdate {
                    term: Some("fa26".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated);
        assert_eq!(store.find_by_id(id).await.unwrap().unwrap().term, "fa26");

        assert!(store.delete(id).await.unwrap());
        assert!(store.find_by_id(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_course_store_list_filters() {
        let store = InMemoryCourseStore::new();
        store.insert(course(UserId::new(), "CS", "sp26")).await.unwrap();
        store.insert(course(UserId::new(), "CS", "fa26")).await.unwrap();
        store.insert(course(UserId::new(), "MTH", "sp26")).await.unwrap();

        let all = store.list(&CourseFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let cs = store
            .list(&CourseFilter {
                subject: Some("CS".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cs.len(), 2);

        let cs_spring = store
            .list(&CourseFilter {
                subject: Some("CS".to_string()),
                term: Some("sp26".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cs_spring.len(), 1);
    }

    #[tokio::test]
    async fn test_set_students_replaces_enrollment() {
        let store = InMemoryCourseStore::new();
        let c = course(UserId::new(), "CS", "sp26");
        let id = c.id;
        store.insert(c).await.unwrap();

        let students = vec![UserId::new(), UserId::new()];
        assert!(store.set_students(id, students.clone()).await.unwrap());
        assert_eq!(
            store.find_by_id(id).await.unwrap().unwrap().students,
            students
        );
    }

    #[tokio::test]
    async fn test_assignment_store_cascade_delete() {
        let store = InMemoryAssignmentStore::new();
        let course_id = CourseId::new();
        let other_course = CourseId::new();

        store.insert(assignment(course_id)).await.unwrap();
        store.insert(assignment(course_id)).await.unwrap();
        store.insert(assignment(other_course)).await.unwrap();

        let removed = store.delete_by_course(course_id).await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.list_by_course(course_id).await.unwrap().is_empty());
        assert_eq!(store.list_by_course(other_course).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submission_store_round_trip() {
        let store = InMemorySubmissionStore::new();
        let assignment_id = AssignmentId::new();
        let submission = Submission {
            id: SubmissionId::new(),
            assignment_id,
            student_id: UserId::new(),
            submitted_at: Utc::now(),
            grade: None,
            filename: "hw1.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        };
        let id = submission.id;

        store
            .insert(submission.clone(), b"file contents".to_vec())
            .await
            .unwrap();

        let (meta, data) = store.read_file(id).await.unwrap().unwrap();
        assert_eq!(meta, submission);
        assert_eq!(data, b"file contents");

        assert_eq!(store.list_by_assignment(assignment_id).await.unwrap().len(), 1);
        assert_eq!(store.delete_by_assignment(assignment_id).await.unwrap(), 1);
        assert!(store.find_by_id(id).await.unwrap().is_none());
    }
}
