//! Assignment handlers: CRUD and submission listing.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use courseway_core::AssignmentId;
use courseway_store::{Assignment, AssignmentStore, SubmissionStore};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::models::{
    AssignmentResponse, Created, CreateAssignmentRequest, PageQuery, SubmissionListResponse,
    UpdateAssignmentRequest,
};
use crate::pagination::paginate;
use crate::policy::{Action, Policy};

/// `POST /assignments` - create an assignment. Admin, or the instructor
/// of the target course. A missing course is a 404, never a role denial.
pub async fn create_assignment(
    Extension(assignments): Extension<Arc<dyn AssignmentStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Created<AssignmentId>>), ApiError> {
    policy
        .require(&identity, Action::CreateAssignment(body.course_id), "Course")
        .await?;
    body.validate()?;

    let assignment = Assignment {
        id: AssignmentId::new(),
        course_id: body.course_id,
        title: body.title,
        points: body.points,
        due: body.due,
    };
    let id = assignment.id;
    assignments.insert(assignment).await?;

    tracing::info!(assignment_id = %id, "assignment created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `GET /assignments/{id}` - assignment metadata. Any authenticated user.
pub async fn get_assignment(
    Extension(assignments): Extension<Arc<dyn AssignmentStore>>,
    Path(id): Path<AssignmentId>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = assignments
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Assignment"))?;
    Ok(Json(assignment.into()))
}

/// `PATCH /assignments/{id}` - update assignment fields. Admin or the
/// owning course's instructor.
pub async fn update_assignment(
    Extension(assignments): Extension<Arc<dyn AssignmentStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<AssignmentId>,
    Json(body): Json<UpdateAssignmentRequest>,
) -> Result<StatusCode, ApiError> {
    policy
        .require(&identity, Action::UpdateAssignment(id), "Assignment")
        .await?;
    body.validate()?;

    let updated = assignments.update(id, body.into()).await?;
    if !updated {
        return Err(ApiError::NotFound("Assignment"));
    }
    Ok(StatusCode::OK)
}

/// `DELETE /assignments/{id}` - remove an assignment and its submissions.
/// Admin or the owning course's instructor.
pub async fn delete_assignment(
    Extension(assignments): Extension<Arc<dyn AssignmentStore>>,
    Extension(submissions): Extension<Arc<dyn SubmissionStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<AssignmentId>,
) -> Result<StatusCode, ApiError> {
    policy
        .require(&identity, Action::DeleteAssignment(id), "Assignment")
        .await?;

    submissions.delete_by_assignment(id).await?;
    let deleted = assignments.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Assignment"));
    }

    tracing::info!(assignment_id = %id, "assignment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /assignments/{id}/submissions` - paginated submission metadata.
/// Admin or the owning course's instructor.
pub async fn list_submissions(
    Extension(submissions): Extension<Arc<dyn SubmissionStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<AssignmentId>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SubmissionListResponse>, ApiError> {
    policy
        .require(&identity, Action::ListSubmissions(id), "Assignment")
        .await?;

    let all = submissions.list_by_assignment(id).await?;
    Ok(Json(paginate(&all, query.page).into()))
}
