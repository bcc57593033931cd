//! Progress ledger
//!
//! Sparse map of (user, lesson) to completion state. A missing row means
//! the lesson was never started.
//!
//! Writes go through a single `INSERT ... ON CONFLICT DO UPDATE` statement
//! against `UNIQUE(user_id, lesson_id)`, so concurrent submissions for the
//! same pair converge on one row.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;
use wpm_common::db::{ProgressRecord, ProgressStatus};
use wpm_common::{time, uuid_utils, Result};

const PROGRESS_COLUMNS: &str = "id, user_id, lesson_id, status, progress_percentage, \
     completed_at, created_at, updated_at";

/// Requested state for one (user, lesson) pair
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    pub status: ProgressStatus,
    pub progress_percentage: i64,
}

/// Percentage actually stored for an update
///
/// Completed lessons are always 100; anything else is clamped to [0, 100].
pub fn normalized_percentage(status: ProgressStatus, requested: i64) -> i64 {
    match status {
        ProgressStatus::Completed => 100,
        _ => requested.clamp(0, 100),
    }
}

fn progress_from_row(row: &SqliteRow) -> Result<ProgressRecord> {
    let status: String = row.try_get("status")?;
    Ok(ProgressRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        lesson_id: row.try_get("lesson_id")?,
        status: status.parse()?,
        progress_percentage: row.try_get("progress_percentage")?,
        completed_at: row.try_get("completed_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Fetch the record for one lesson, `None` if never started
pub async fn get_progress(
    pool: &SqlitePool,
    user_id: &str,
    lesson_id: &str,
) -> Result<Option<ProgressRecord>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM user_progress WHERE user_id = ? AND lesson_id = ?",
        PROGRESS_COLUMNS
    ))
    .bind(user_id)
    .bind(lesson_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(progress_from_row).transpose()
}

/// All records for a user, in no particular order
pub async fn list_progress(pool: &SqlitePool, user_id: &str) -> Result<Vec<ProgressRecord>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM user_progress WHERE user_id = ?",
        PROGRESS_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(progress_from_row).collect()
}

/// Insert or replace the record for (user, lesson)
///
/// An existing row keeps its id and `created_at`. `completed_at` is stamped
/// with the current time on completion and cleared for any other status.
/// Any status may follow any other.
pub async fn upsert_progress(
    pool: &SqlitePool,
    user_id: &str,
    lesson_id: &str,
    update: ProgressUpdate,
) -> Result<ProgressRecord> {
    let now = time::now();
    let percentage = normalized_percentage(update.status, update.progress_percentage);
    let completed_at = (update.status == ProgressStatus::Completed).then_some(now);

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO user_progress (
            id, user_id, lesson_id, status, progress_percentage,
            completed_at, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, lesson_id) DO UPDATE SET
            status = excluded.status,
            progress_percentage = excluded.progress_percentage,
            completed_at = excluded.completed_at,
            updated_at = excluded.updated_at
        RETURNING {}
        "#,
        PROGRESS_COLUMNS
    ))
    .bind(uuid_utils::generate())
    .bind(user_id)
    .bind(lesson_id)
    .bind(update.status.as_str())
    .bind(percentage)
    .bind(completed_at)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    let record = progress_from_row(&row)?;
    debug!(
        "Progress {} / {}: {} at {}%",
        user_id, lesson_id, record.status, record.progress_percentage
    );
    Ok(record)
}
