use axum::{
    Extension,
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use seekr_types::models::OwnerId;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/export
///
/// Sends the owner's report as a PDF download.
///
/// Nothing is sent until the document is fully rendered; the body is then
/// streamed in chunks.
pub async fn export_report(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Response, ApiError> {
    let report = state.export.generate_report(&owner).await?;

    let headers = [
        (header::CONTENT_TYPE, report.content_type().to_string()),
        (header::CONTENT_LENGTH, report.len().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.file_name()),
        ),
    ];

    Ok((headers, Body::from_stream(report.into_stream())).into_response())
}
