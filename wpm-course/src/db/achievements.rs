//! Achievement records

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use wpm_common::db::{Achievement, AchievementKind};
use wpm_common::{time, uuid_utils, Result};

const ACHIEVEMENT_COLUMNS: &str = "id, user_id, kind, name, description, earned_at";

fn achievement_from_row(row: &SqliteRow) -> Result<Achievement> {
    let kind: String = row.try_get("kind")?;
    Ok(Achievement {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: kind.parse()?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        earned_at: row.try_get("earned_at")?,
    })
}

/// List a user's achievements, newest first
pub async fn list_achievements(pool: &SqlitePool, user_id: &str) -> Result<Vec<Achievement>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM achievements WHERE user_id = ? ORDER BY earned_at DESC, id DESC",
        ACHIEVEMENT_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(achievement_from_row).collect()
}

pub async fn create_achievement(
    pool: &SqlitePool,
    user_id: &str,
    kind: AchievementKind,
    name: &str,
    description: Option<&str>,
) -> Result<Achievement> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO achievements (id, user_id, kind, name, description, earned_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        ACHIEVEMENT_COLUMNS
    ))
    .bind(uuid_utils::generate())
    .bind(user_id)
    .bind(kind.as_str())
    .bind(name)
    .bind(description)
    .bind(time::now())
    .fetch_one(pool)
    .await?;

    achievement_from_row(&row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::ensure_user;
    use wpm_common::db::init_memory_database;

    #[tokio::test]
    async fn test_newest_first() {
        let pool = init_memory_database().await.unwrap();
        ensure_user(&pool, "u1").await.unwrap();

        create_achievement(&pool, "u1", AchievementKind::Streak, "3 day streak", None)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        create_achievement(&pool, "u1", AchievementKind::Certificate, "Theme Developer", Some("Finished themes"))
            .await
            .unwrap();

        let list = list_achievements(&pool, "u1").await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].kind, AchievementKind::Certificate);
        assert_eq!(list[1].kind, AchievementKind::Streak);
    }

    #[tokio::test]
    async fn test_other_users_hidden() {
        let pool = init_memory_database().await.unwrap();
        ensure_user(&pool, "u1").await.unwrap();
        ensure_user(&pool, "u2").await.unwrap();
        create_achievement(&pool, "u1", AchievementKind::Completion, "First lesson", None)
            .await
            .unwrap();

        assert!(list_achievements(&pool, "u2").await.unwrap().is_empty());
    }
}
