//! HTTP API handlers for wpm-course

pub mod auth;
pub mod curriculum;
pub mod dashboard;
pub mod health;
pub mod progress;

pub use auth::{get_current_user, require_user, CurrentUser, USER_ID_HEADER};
pub use curriculum::{
    get_adjacent, get_lesson, get_lesson_by_slug, get_lesson_view, list_categories, list_lessons,
};
pub use dashboard::{get_dashboard, list_achievements};
pub use health::health_routes;
pub use progress::{get_progress, list_progress, submit_progress};
