//! User resolution for authenticated routes
//!
//! Login happens upstream; by the time a request reaches this service the
//! caller's identity is carried in the `x-user-id` header. The middleware
//! loads (or provisions) that user and hands it to handlers as
//! `Extension<CurrentUser>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use tracing::debug;
use wpm_common::db::User;

use crate::db::users;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// User resolved for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolve the caller or reject with 401
///
/// First-seen user ids are provisioned with a free entitlement.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", USER_ID_HEADER)))?;

    let user = users::ensure_user(&state.db, &user_id).await?;
    debug!("Request authenticated as {} ({})", user.id, user.entitlement);

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// GET /api/auth/user
pub async fn get_current_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}
