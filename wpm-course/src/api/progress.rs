//! Progress endpoints
//!
//! Submissions are validated before anything is written: the percentage
//! must be in [0, 100] and the lesson must exist.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use wpm_common::db::{ProgressRecord, ProgressStatus};

use super::auth::CurrentUser;
use crate::db::{curriculum, progress, ProgressUpdate};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitProgressRequest {
    pub lesson_id: String,
    pub status: ProgressStatus,
    #[serde(default)]
    pub progress_percentage: i64,
}

/// GET /api/progress
pub async fn list_progress(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<ProgressRecord>>> {
    Ok(Json(progress::list_progress(&state.db, &user.id).await?))
}

/// GET /api/progress/:lesson_id
///
/// A lesson that was never started returns `null`.
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(lesson_id): Path<String>,
) -> ApiResult<Json<Option<ProgressRecord>>> {
    Ok(Json(progress::get_progress(&state.db, &user.id, &lesson_id).await?))
}

/// POST /api/progress
pub async fn submit_progress(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<SubmitProgressRequest>, JsonRejection>,
) -> ApiResult<Json<ProgressRecord>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if !(0..=100).contains(&request.progress_percentage) {
        return Err(ApiError::BadRequest(format!(
            "progress_percentage must be between 0 and 100, got {}",
            request.progress_percentage
        )));
    }

    if curriculum::get_lesson_by_id(&state.db, &request.lesson_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!("lesson {}", request.lesson_id)));
    }

    let record = progress::upsert_progress(
        &state.db,
        &user.id,
        &request.lesson_id,
        ProgressUpdate {
            status: request.status,
            progress_percentage: request.progress_percentage,
        },
    )
    .await?;

    Ok(Json(record))
}
