//! Integration tests for database initialization
//!
//! Covers automatic creation on first run, reopening an existing database,
//! and the schema constraints the course services rely on.

use tempfile::TempDir;
use wpm_common::db::init::{init_database, DEFAULT_BUSY_TIMEOUT_MS};
use wpm_common::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("wpm.db");

    assert!(!db_path.exists());

    let result = init_database(&db_path, DEFAULT_BUSY_TIMEOUT_MS).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());

    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("wpm.db");

    let pool1 = init_database(&db_path, DEFAULT_BUSY_TIMEOUT_MS).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path, DEFAULT_BUSY_TIMEOUT_MS).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    let version = get_schema_version(&pool2.unwrap()).await.unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn test_wal_mode_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("wpm.db");
    let pool = init_database(&db_path, DEFAULT_BUSY_TIMEOUT_MS).await.unwrap();

    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[tokio::test]
async fn test_progress_unique_per_user_and_lesson() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("wpm.db");
    let pool = init_database(&db_path, DEFAULT_BUSY_TIMEOUT_MS).await.unwrap();
    let now = wpm_common::time::now();

    sqlx::query("INSERT INTO users (id, entitlement, created_at, updated_at) VALUES ('u1', 'free', ?, ?)")
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO categories (id, name, slug, sort_order, created_at) VALUES ('c1', 'Themes', 'themes', 1, ?)")
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO lessons (id, title, slug, sort_order, category_id, tier, created_at, updated_at)
         VALUES ('l1', 'Template Hierarchy', 'template-hierarchy', 1, 'c1', 'free', ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();

    let insert = "INSERT INTO user_progress (id, user_id, lesson_id, status, progress_percentage, created_at, updated_at)
                  VALUES (?, 'u1', 'l1', 'in_progress', 10, ?, ?)";

    sqlx::query(insert)
        .bind("p1")
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();

    let duplicate = sqlx::query(insert)
        .bind("p2")
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await;

    assert!(duplicate.is_err(), "second row for the same (user, lesson) must be rejected");
}

#[tokio::test]
async fn test_percentage_range_enforced() {
    let pool = wpm_common::db::init::init_memory_database().await.unwrap();
    let now = wpm_common::time::now();

    sqlx::query("INSERT INTO users (id, entitlement, created_at, updated_at) VALUES ('u1', 'free', ?, ?)")
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO categories (id, name, slug, sort_order, created_at) VALUES ('c1', 'API', 'api', 1, ?)")
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO lessons (id, title, slug, sort_order, category_id, tier, created_at, updated_at)
         VALUES ('l1', 'REST API', 'rest-api', 1, 'c1', 'premium', ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();

    let result = sqlx::query(
        "INSERT INTO user_progress (id, user_id, lesson_id, status, progress_percentage, created_at, updated_at)
         VALUES ('p1', 'u1', 'l1', 'in_progress', 150, ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await;

    assert!(result.is_err(), "percentage above 100 must violate the CHECK constraint");
}
