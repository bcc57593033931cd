//! Concurrent progress submissions against a file-backed database
//!
//! Many tasks upserting the same (user, lesson) pair through a multi-connection
//! WAL pool must converge on a single row.

use tempfile::TempDir;
use tokio::task::JoinSet;
use wpm_common::db::{init_database, LessonTier, ProgressStatus};
use wpm_course::db::{curriculum, progress, users, NewCategory, NewLesson, ProgressUpdate};

async fn setup() -> (TempDir, sqlx::SqlitePool, String) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("wpm.db"), 5000).await.unwrap();

    let category = curriculum::create_category(
        &pool,
        &NewCategory {
            name: "Plugin Development".to_string(),
            slug: "plugins".to_string(),
            description: None,
            sort_order: 5,
        },
    )
    .await
    .unwrap();

    let lesson = curriculum::create_lesson(
        &pool,
        &NewLesson {
            title: "Plugin Architecture".to_string(),
            slug: "plugin-architecture".to_string(),
            description: None,
            content: None,
            video_url: None,
            duration_minutes: Some(45),
            sort_order: 17,
            category_id: category.id,
            tier: LessonTier::Premium,
            practice_exercise: None,
            resources: None,
        },
    )
    .await
    .unwrap();

    users::ensure_user(&pool, "racer").await.unwrap();
    (dir, pool, lesson.id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_converge_to_one_row() {
    let (_dir, pool, lesson_id) = setup().await;

    let mut tasks = JoinSet::new();
    for i in 0..32i64 {
        let pool = pool.clone();
        let lesson_id = lesson_id.clone();
        tasks.spawn(async move {
            let status = if i % 4 == 0 {
                ProgressStatus::Completed
            } else {
                ProgressStatus::InProgress
            };
            progress::upsert_progress(
                &pool,
                "racer",
                &lesson_id,
                ProgressUpdate {
                    status,
                    progress_percentage: i * 3,
                },
            )
            .await
        });
    }

    let mut ids = Vec::new();
    while let Some(result) = tasks.join_next().await {
        let record = result.expect("task panicked").expect("upsert failed");
        ids.push(record.id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1, "every upsert must return the same record");

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_progress WHERE user_id = ? AND lesson_id = ?",
    )
    .bind("racer")
    .bind(&lesson_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_users_do_not_interfere() {
    let (_dir, pool, lesson_id) = setup().await;
    for n in 0..8 {
        users::ensure_user(&pool, &format!("user-{}", n)).await.unwrap();
    }

    let mut tasks = JoinSet::new();
    for n in 0..8 {
        let pool = pool.clone();
        let lesson_id = lesson_id.clone();
        tasks.spawn(async move {
            progress::upsert_progress(
                &pool,
                &format!("user-{}", n),
                &lesson_id,
                ProgressUpdate {
                    status: ProgressStatus::Completed,
                    progress_percentage: 100,
                },
            )
            .await
        });
    }

    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_progress")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 8);
}
