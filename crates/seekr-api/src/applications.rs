use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use seekr_db::{DeleteSelector, Insertion};
use seekr_types::api::{ApplicationUpdateCommand, DataResponse, NewApplicationRequest};
use seekr_types::models::{Application, ApplicationDetails, ApplicationListItem, OwnerId};

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::state::AppState;

/// GET /api/applications
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<DataResponse<Vec<ApplicationListItem>>>, ApiError> {
    let data = state.applications.get_all_applications(&owner).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/applications
pub async fn create_application(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Json(req): Json<NewApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let application = Application {
        id: req.id.unwrap_or_else(Uuid::new_v4),
        user_id: owner,
        company: req.company,
        position: req.position,
        application_date: req.application_date,
        status: req.status,
        job_description: req.job_description,
        job_posting_url: req.job_posting_url,
    };

    match state.applications.add_application(application).await? {
        Insertion::Created(data) => {
            info!("Application {} created for {}", data.id, data.user_id);
            Ok((StatusCode::CREATED, Json(DataResponse { data })))
        }
        Insertion::AlreadyExists => Err(ApiError::Conflict("Application already exists")),
    }
}

/// GET /api/applications/{id}
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<DataResponse<ApplicationDetails>>, ApiError> {
    let data = state.applications.get_application_by_id(&owner, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/applications/{id}
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(owner): Extension<OwnerId>,
    Json(command): Json<ApplicationUpdateCommand>,
) -> Result<Json<DataResponse<Application>>, ApiError> {
    let data = match command {
        ApplicationUpdateCommand::SetStatus { status } => {
            state
                .applications
                .set_application_status(&owner, id, status)
                .await?
        }
        ApplicationUpdateCommand::SetJobDescription { job_description } => {
            state
                .applications
                .set_application_job_description(&owner, id, job_description)
                .await?
        }
    };
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/applications/of-user
pub async fn delete_user_applications(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<&'static str, ApiError> {
    info!("Deleting all applications of {}", owner);
    state
        .applications
        .delete_applications(DeleteSelector::ByOwner { owner_id: owner })
        .await?;
    Ok("done")
}

/// DELETE /api/applications/{id}
///
/// The id-set delete is not owner-scoped, so ownership is checked first.
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(owner): Extension<OwnerId>,
) -> Result<&'static str, ApiError> {
    state.applications.get_application_by_id(&owner, id).await?;
    state
        .applications
        .delete_applications(DeleteSelector::ByIds { ids: vec![id] })
        .await?;
    Ok("done")
}
