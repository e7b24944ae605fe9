//! Submission handlers: file upload and download.

use axum::{
    extract::{Multipart, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use courseway_core::{AssignmentId, SubmissionId};
use courseway_store::{Submission, SubmissionStore};
use std::sync::Arc;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::models::SubmissionCreatedResponse;
use crate::policy::{Action, Policy};

/// `POST /assignments/{id}/submissions` - upload a file submission.
/// Admin, or a student enrolled in the owning course.
pub async fn create_submission(
    Extension(submissions): Extension<Arc<dyn SubmissionStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(assignment_id): Path<AssignmentId>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionCreatedResponse>), ApiError> {
    policy
        .require(
            &identity,
            Action::CreateSubmission(assignment_id),
            "Assignment",
        )
        .await?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("submission").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            file = Some((filename, content_type, data.to_vec()));
        }
    }

    let Some((filename, content_type, data)) = file else {
        return Err(ApiError::Validation(
            "multipart field 'file' is required".to_string(),
        ));
    };

    let submission = Submission {
        id: SubmissionId::new(),
        assignment_id,
        student_id: identity.id,
        submitted_at: Utc::now(),
        grade: None,
        filename,
        content_type,
    };
    let id = submission.id;
    submissions.insert(submission, data).await?;

    tracing::info!(submission_id = %id, student_id = %identity.id, "submission uploaded");
    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreatedResponse::new(id, assignment_id)),
    ))
}

/// `GET /submissions/{id}/file` - download the stored file. Admin, the
/// submitting student, or the owning course's instructor.
pub async fn download_submission(
    Extension(submissions): Extension<Arc<dyn SubmissionStore>>,
    Extension(policy): Extension<Arc<Policy>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<SubmissionId>,
) -> Result<Response, ApiError> {
    policy
        .require(&identity, Action::DownloadSubmission(id), "Submission")
        .await?;

    let (meta, data) = submissions
        .read_file(id)
        .await?
        .ok_or(ApiError::NotFound("Submission"))?;

    let headers = [
        (header::CONTENT_TYPE, meta.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", meta.filename),
        ),
    ];
    Ok((headers, data).into_response())
}
