use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ApplicationStatus;

// -- JWT Claims --

/// Claims carried by the bearer token. The token is issued elsewhere; `sub`
/// becomes the owner id of every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Envelopes --

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Applications --

/// Body of `POST /api/applications`. A client-chosen `id` makes retries
/// idempotent; without one the server assigns a fresh id.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewApplicationRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub company: String,
    pub position: String,
    pub application_date: NaiveDate,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_posting_url: String,
}

/// Body of `PUT /api/applications/{id}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApplicationUpdateCommand {
    SetStatus { status: ApplicationStatus },
    SetJobDescription { job_description: String },
}

// -- Interviews --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewInterviewRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub application_id: Uuid,
    pub interview_date: DateTime<Utc>,
    pub topic: String,
    #[serde(default)]
    pub participants: String,
    #[serde(default)]
    pub prep_notes: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCommentRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub comment: String,
    #[serde(default)]
    pub pinned: bool,
}
