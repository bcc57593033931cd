//! User accounts
//!
//! Identity is established upstream; this table only stores the profile
//! and entitlement tier of each user id seen so far.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use wpm_common::db::{Entitlement, User};
use wpm_common::{time, Error, Result};

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, profile_image_url, entitlement, created_at, updated_at";

/// Profile fields supplied by the identity provider
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let entitlement: String = row.try_get("entitlement")?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        profile_image_url: row.try_get("profile_image_url")?,
        entitlement: entitlement.parse()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Return the user, provisioning a free-tier account on first sight
pub async fn ensure_user(pool: &SqlitePool, id: &str) -> Result<User> {
    let now = time::now();
    let inserted = sqlx::query(
        r#"
        INSERT INTO users (id, entitlement, created_at, updated_at)
        VALUES (?, 'free', ?, ?)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        info!("Provisioned new user {}", id);
    }

    get_user(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("user {} vanished after provisioning", id)))
}

/// Insert or refresh a user's profile
///
/// Entitlement and creation timestamp of an existing user are preserved.
pub async fn upsert_user(pool: &SqlitePool, id: &str, profile: &UserProfile) -> Result<User> {
    let now = time::now();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO users (id, email, first_name, last_name, profile_image_url, entitlement, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'free', ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            email = excluded.email,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            profile_image_url = excluded.profile_image_url,
            updated_at = excluded.updated_at
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(id)
    .bind(&profile.email)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.profile_image_url)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    user_from_row(&row)
}

/// Change a user's entitlement tier
///
/// Returns `NotFound` if the user does not exist.
pub async fn set_entitlement(pool: &SqlitePool, id: &str, entitlement: Entitlement) -> Result<User> {
    let row = sqlx::query(&format!(
        "UPDATE users SET entitlement = ?, updated_at = ? WHERE id = ? RETURNING {}",
        USER_COLUMNS
    ))
    .bind(entitlement.as_str())
    .bind(time::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => user_from_row(&row),
        None => Err(Error::NotFound(format!("user {}", id))),
    }
}
