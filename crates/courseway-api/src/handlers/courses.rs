//! Course handlers: CRUD, enrollment, roster export.

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use courseway_core::{CourseId, UserId};
use courseway_store::{AssignmentStore, Course, CourseStore, SubmissionStore, UserStore};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::models::{
    AssignmentListResponse, CourseListQuery, CourseListResponse, CourseResponse, Created,
    CreateCourseRequest, EnrollmentUpdateRequest, UpdateCourseRequest,
};
use crate::pagination::paginate;
use crate::policy::{Action, Policy};

/// `GET /courses` - paginated listing, filterable by subject/number/term.
/// Public: course metadata is not sensitive.
pub async fn list_courses(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let matching = courses.list(&query.filter()).await?;
    Ok(Json(paginate(&matching, query.page).into()))
}

/// `POST /courses` - create a course. Admin only.
pub async fn create_course(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Created<CourseId>>), ApiError> {
    policy
        .require(&identity, Action::CreateCourse, "Course")
        .await?;
    body.validate()?;

    let course = Course {
        id: CourseId::new(),
        subject: body.subject,
        number: body.number,
        title: body.title,
        term: body.term,
        instructor_id: body.instructor_id,
        students: Vec::new(),
    };
    let id = course.id;
    courses.insert(course).await?;

    tracing::info!(course_id = %id, "course created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `GET /courses/{id}` - course metadata. Public.
pub async fn get_course(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Path(id): Path<CourseId>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = courses
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;
    Ok(Json(course.into()))
}

/// `PATCH /courses/{id}` - update course fields. Admin or owning instructor.
pub async fn update_course(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<CourseId>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<StatusCode, ApiError> {
    policy
        .require(&identity, Action::UpdateCourse(id), "Course")
        .await?;
    body.validate()?;

    let updated = courses.update(id, body.into()).await?;
    if !updated {
        return Err(ApiError::NotFound("Course"));
    }
    Ok(StatusCode::OK)
}

/// `DELETE /courses/{id}` - remove a course and everything beneath it.
/// Admin or owning instructor.
pub async fn delete_course(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Extension(assignments): Extension<Arc<dyn AssignmentStore>>,
    Extension(submissions): Extension<Arc<dyn SubmissionStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, ApiError> {
    policy
        .require(&identity, Action::DeleteCourse(id), "Course")
        .await?;

    // Cascade: submissions of each assignment, then the assignments,
    // then the course itself.
    for assignment in assignments.list_by_course(id).await? {
        submissions.delete_by_assignment(assignment.id).await?;
    }
    assignments.delete_by_course(id).await?;
    let deleted = courses.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Course"));
    }

    tracing::info!(course_id = %id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /courses/{id}/students` - the enrollment set. Admin or owning
/// instructor.
pub async fn get_students(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<CourseId>,
) -> Result<Json<Vec<UserId>>, ApiError> {
    policy
        .require(&identity, Action::ViewEnrollment(id), "Course")
        .await?;

    let course = courses
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;
    Ok(Json(course.students))
}

/// `POST /courses/{id}/students` - enrollment update. Admin or owning
/// instructor. Removals are applied before additions; additions are
/// de-duplicated against the resulting set.
pub async fn update_enrollment(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<CourseId>,
    Json(body): Json<EnrollmentUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    policy
        .require(&identity, Action::UpdateEnrollment(id), "Course")
        .await?;

    if body.is_empty() {
        return Err(ApiError::Validation(
            "at least one of 'add' or 'remove' is required".to_string(),
        ));
    }

    let course = courses
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;

    let mut students = course.students;
    if let Some(remove) = &body.remove {
        students.retain(|s| !remove.contains(s));
    }
    if let Some(add) = &body.add {
        for student in add {
            if !students.contains(student) {
                students.push(*student);
            }
        }
    }

    courses.set_students(id, students).await?;
    Ok(StatusCode::OK)
}

/// `GET /courses/{id}/roster` - CSV download of the enrolled students.
/// Admin or owning instructor.
pub async fn get_roster(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Extension(users): Extension<Arc<dyn UserStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<CourseId>,
) -> Result<Response, ApiError> {
    policy
        .require(&identity, Action::ViewEnrollment(id), "Course")
        .await?;

    let course = courses
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for student_id in &course.students {
        // Enrollment entries whose account has since been removed are
        // skipped rather than failing the whole export.
        let Some(student) = users.find_by_id(*student_id).await? else {
            tracing::warn!(course_id = %id, student_id = %student_id, "roster entry has no account");
            continue;
        };
        writer
            .write_record([&student.id.to_string(), &student.name, &student.email])
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=course-{id}-roster.csv"),
        ),
    ];
    Ok((headers, data).into_response())
}

/// `GET /courses/{id}/assignments` - assignment paths for a course.
/// Any authenticated user.
pub async fn list_course_assignments(
    Extension(courses): Extension<Arc<dyn CourseStore>>,
    Extension(assignments): Extension<Arc<dyn AssignmentStore>>,
    Path(id): Path<CourseId>,
) -> Result<Json<AssignmentListResponse>, ApiError> {
    if courses.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound("Course"));
    }

    let paths = assignments
        .list_by_course(id)
        .await?
        .into_iter()
        .map(|a| format!("/assignments/{}", a.id))
        .collect();

    Ok(Json(AssignmentListResponse { assignments: paths }))
}
