//! Dashboard and achievements endpoints

use axum::{extract::State, Extension, Json};
use wpm_common::db::Achievement;

use super::auth::CurrentUser;
use crate::db::achievements;
use crate::error::ApiResult;
use crate::services::{stats, Dashboard};
use crate::AppState;

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(stats::dashboard(&state.db, &user.id, &state.stats).await?))
}

/// GET /api/achievements
pub async fn list_achievements(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Achievement>>> {
    Ok(Json(achievements::list_achievements(&state.db, &user.id).await?))
}
