//! Axum route handlers for the Resume API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{AuthoredResume, DeletedResume, Resume, ResumeDetail};
use crate::state::AppState;

const CREATED: &str = "Resume created successfully.";
const LISTED: &str = "Resumes retrieved successfully.";
const DETAILED: &str = "Resume retrieved successfully.";
const UPDATED: &str = "Resume updated successfully.";
const DELETED: &str = "Resume deleted successfully.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Success envelope shared by every resume endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: &'static str,
    pub data: T,
}

type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

fn respond<T>(status: StatusCode, message: &'static str, data: T) -> Envelope<T> {
    (
        status,
        Json(ApiResponse {
            status: status.as_u16(),
            message,
            data,
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateResumeRequest>, JsonRejection>,
) -> Result<Envelope<Resume>, AppError> {
    let Json(req) = payload?;
    require_text("title", &req.title)?;
    require_text("content", &req.content)?;

    let resume = state
        .resumes
        .create(user.id(), req.title, req.content)
        .await?;
    Ok(respond(StatusCode::CREATED, CREATED, resume))
}

/// GET /api/v1/resumes?sort=asc|desc
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Envelope<Vec<AuthoredResume>>, AppError> {
    let resumes = state
        .resumes
        .read_many(user.id(), query.sort.as_deref())
        .await?;
    Ok(respond(StatusCode::OK, LISTED, resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Envelope<ResumeDetail>, AppError> {
    let resume = state
        .resumes
        .read_one(&id, user.id())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(respond(StatusCode::OK, DETAILED, resume))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateResumeRequest>, JsonRejection>,
) -> Result<Envelope<Resume>, AppError> {
    let Json(req) = payload?;
    if req.title.is_none() && req.content.is_none() {
        return Err(AppError::Validation(
            "at least one of title or content is required".to_string(),
        ));
    }
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }
    if let Some(content) = &req.content {
        require_text("content", content)?;
    }

    let resume = state
        .resumes
        .update(&id, user.id(), req.title, req.content)
        .await?;
    Ok(respond(StatusCode::OK, UPDATED, resume))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Envelope<DeletedResume>, AppError> {
    let deleted = state.resumes.delete(&id, user.id()).await?;
    Ok(respond(StatusCode::OK, DELETED, deleted))
}
