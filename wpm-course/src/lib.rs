//! wpm-course library - WordPress course service
//!
//! Serves the curriculum, records per-user lesson progress and computes the
//! dashboard statistics derived from it.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use wpm_common::config::StatsConfig;

pub mod api;
pub mod db;
pub mod error;
pub mod seed;
pub mod services;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub stats: StatsConfig,
}

impl AppState {
    pub fn new(db: SqlitePool, stats: StatsConfig) -> Self {
        Self { db, stats }
    }
}

/// Build application router
///
/// Routes under `user` resolve the caller from the `x-user-id` header and
/// reject anonymous requests with 401.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::get;

    let user = Router::new()
        .route("/api/auth/user", get(api::get_current_user))
        .route("/api/dashboard", get(api::get_dashboard))
        .route("/api/progress", get(api::list_progress).post(api::submit_progress))
        .route("/api/progress/:lesson_id", get(api::get_progress))
        .route("/api/achievements", get(api::list_achievements))
        .route("/api/lessons/slug/:slug/view", get(api::get_lesson_view))
        .layer(middleware::from_fn_with_state(state.clone(), api::require_user));

    let public = Router::new()
        .route("/api/categories", get(api::list_categories))
        .route("/api/lessons", get(api::list_lessons))
        .route("/api/lessons/:id", get(api::get_lesson))
        .route("/api/lessons/:id/adjacent", get(api::get_adjacent))
        .route("/api/lessons/slug/:slug", get(api::get_lesson_by_slug))
        .merge(api::health_routes());

    Router::new()
        .merge(user)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
