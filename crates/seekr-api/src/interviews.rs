use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use seekr_db::Insertion;
use seekr_types::api::{DataResponse, NewCommentRequest, NewInterviewRequest};
use seekr_types::models::{Interview, InterviewComment, InterviewDetails, OwnerId};

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::state::AppState;

/// POST /api/interviews
pub async fn create_interview(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Json(req): Json<NewInterviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let interview = Interview {
        id: req.id.unwrap_or_else(Uuid::new_v4),
        application_id: req.application_id,
        interview_date: req.interview_date,
        topic: req.topic,
        participants: req.participants,
        prep_notes: req.prep_notes,
    };

    match state.interviews.add_interview(&owner, interview).await? {
        Insertion::Created(data) => Ok((StatusCode::CREATED, Json(DataResponse { data }))),
        Insertion::AlreadyExists => Err(ApiError::Conflict("Interview already exists")),
    }
}

/// GET /api/interviews/{id}
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<DataResponse<InterviewDetails>>, ApiError> {
    let data = state.interviews.get_interview_by_id(&owner, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/interviews/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Extension(owner): Extension<OwnerId>,
    Json(req): Json<NewCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = InterviewComment {
        id: req.id.unwrap_or_else(Uuid::new_v4),
        interview_id,
        comment: req.comment,
        pinned: req.pinned,
    };

    match state.interviews.add_comment(&owner, comment).await? {
        Insertion::Created(data) => Ok((StatusCode::CREATED, Json(DataResponse { data }))),
        Insertion::AlreadyExists => Err(ApiError::Conflict("Comment already exists")),
    }
}

/// DELETE /api/interviews/{id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((interview_id, comment_id)): Path<(Uuid, Uuid)>,
    Extension(owner): Extension<OwnerId>,
) -> Result<&'static str, ApiError> {
    state
        .interviews
        .delete_comment(&owner, interview_id, comment_id)
        .await?;
    Ok("done")
}
