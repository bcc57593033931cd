//! Curriculum browsing endpoints
//!
//! Everything except the lesson view is public. Lesson payloads from the
//! public routes are returned as stored; per-user gating happens in the
//! lesson view.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use wpm_common::db::{Category, Lesson};

use super::auth::CurrentUser;
use crate::db::curriculum;
use crate::error::{ApiError, ApiResult};
use crate::services::{self, Adjacent, LessonView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LessonQuery {
    /// Restrict the listing to one category
    pub category_id: Option<String>,
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(curriculum::list_categories(&state.db).await?))
}

/// GET /api/lessons?category_id=
pub async fn list_lessons(
    State(state): State<AppState>,
    Query(query): Query<LessonQuery>,
) -> ApiResult<Json<Vec<Lesson>>> {
    let lessons = curriculum::list_lessons(&state.db, query.category_id.as_deref()).await?;
    Ok(Json(lessons))
}

/// GET /api/lessons/:id
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Lesson>> {
    curriculum::get_lesson_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("lesson {}", id)))
}

/// GET /api/lessons/slug/:slug
pub async fn get_lesson_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Lesson>> {
    curriculum::get_lesson_by_slug(&state.db, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("lesson {}", slug)))
}

/// GET /api/lessons/:id/adjacent
///
/// Unknown lessons yield `{previous: null, next: null}`.
pub async fn get_adjacent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Adjacent>> {
    Ok(Json(services::adjacent(&state.db, &id).await?))
}

/// GET /api/lessons/slug/:slug/view
pub async fn get_lesson_view(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> ApiResult<Json<LessonView>> {
    services::lesson_view(&state.db, &slug, &user)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("lesson {}", slug)))
}
