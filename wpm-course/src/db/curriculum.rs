//! Curriculum store
//!
//! Ordered read access to categories and lessons. Rows are written only by
//! the seeding path; at runtime the curriculum is read-only.
//!
//! Listings sort by `sort_order` and break ties by `id`, so repeated calls
//! always return the same sequence.

use serde::de::DeserializeOwned;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::warn;
use wpm_common::db::{Category, Lesson, LessonTier, PracticeExercise};
use wpm_common::{time, uuid_utils, Result};

const CATEGORY_COLUMNS: &str = "id, name, slug, description, sort_order, created_at";

const LESSON_COLUMNS: &str = "id, title, slug, description, content, video_url, \
     duration_minutes, sort_order, category_id, tier, practice_exercise, resources, \
     created_at, updated_at";

/// Category to be created by the authoring path
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i64,
}

/// Lesson to be created by the authoring path
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration_minutes: Option<i64>,
    pub sort_order: i64,
    pub category_id: String,
    pub tier: LessonTier,
    pub practice_exercise: Option<PracticeExercise>,
    pub resources: Option<serde_json::Value>,
}

fn category_from_row(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        sort_order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
    })
}

fn lesson_from_row(row: &SqliteRow) -> Result<Lesson> {
    let id: String = row.try_get("id")?;
    let tier: String = row.try_get("tier")?;
    let practice_exercise = decode_descriptor(&id, "practice_exercise", row.try_get("practice_exercise")?);
    let resources = decode_descriptor(&id, "resources", row.try_get("resources")?);

    Ok(Lesson {
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        content: row.try_get("content")?,
        video_url: row.try_get("video_url")?,
        duration_minutes: row.try_get("duration_minutes")?,
        sort_order: row.try_get("sort_order")?,
        category_id: row.try_get("category_id")?,
        tier: tier.parse()?,
        practice_exercise,
        resources,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        id,
    })
}

/// Decode a JSON descriptor column
///
/// A malformed stored descriptor is treated as absent so one bad row cannot
/// take down the whole listing.
fn decode_descriptor<T: DeserializeOwned>(lesson_id: &str, column: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Lesson {}: ignoring malformed {} descriptor: {}", lesson_id, column, e);
            None
        }
    }
}

/// List all categories in display order
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM categories ORDER BY sort_order ASC, id ASC",
        CATEGORY_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(category_from_row).collect()
}

pub async fn get_category(pool: &SqlitePool, id: &str) -> Result<Option<Category>> {
    let row = sqlx::query(&format!("SELECT {} FROM categories WHERE id = ?", CATEGORY_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(category_from_row).transpose()
}

pub async fn get_category_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Category>> {
    let row = sqlx::query(&format!("SELECT {} FROM categories WHERE slug = ?", CATEGORY_COLUMNS))
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(category_from_row).transpose()
}

/// List lessons by ordinal position, optionally restricted to one category
///
/// An unknown category id yields an empty list.
pub async fn list_lessons(pool: &SqlitePool, category_id: Option<&str>) -> Result<Vec<Lesson>> {
    let rows = match category_id {
        Some(category_id) => {
            sqlx::query(&format!(
                "SELECT {} FROM lessons WHERE category_id = ? ORDER BY sort_order ASC, id ASC",
                LESSON_COLUMNS
            ))
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM lessons ORDER BY sort_order ASC, id ASC",
                LESSON_COLUMNS
            ))
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(lesson_from_row).collect()
}

pub async fn get_lesson_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Lesson>> {
    let row = sqlx::query(&format!("SELECT {} FROM lessons WHERE id = ?", LESSON_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(lesson_from_row).transpose()
}

pub async fn get_lesson_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Lesson>> {
    let row = sqlx::query(&format!("SELECT {} FROM lessons WHERE slug = ?", LESSON_COLUMNS))
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(lesson_from_row).transpose()
}

/// Insert a category
///
/// Fails with a database error if the slug is already taken.
pub async fn create_category(pool: &SqlitePool, category: &NewCategory) -> Result<Category> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO categories (id, name, slug, description, sort_order, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        CATEGORY_COLUMNS
    ))
    .bind(uuid_utils::generate())
    .bind(&category.name)
    .bind(&category.slug)
    .bind(&category.description)
    .bind(category.sort_order)
    .bind(time::now())
    .fetch_one(pool)
    .await?;

    category_from_row(&row)
}

/// Insert a lesson
///
/// Fails with a database error if the slug is taken or the category does
/// not exist.
pub async fn create_lesson(pool: &SqlitePool, lesson: &NewLesson) -> Result<Lesson> {
    let practice_exercise = lesson
        .practice_exercise
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let resources = lesson.resources.as_ref().map(serde_json::to_string).transpose()?;
    let now = time::now();

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO lessons (
            id, title, slug, description, content, video_url, duration_minutes,
            sort_order, category_id, tier, practice_exercise, resources,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        LESSON_COLUMNS
    ))
    .bind(uuid_utils::generate())
    .bind(&lesson.title)
    .bind(&lesson.slug)
    .bind(&lesson.description)
    .bind(&lesson.content)
    .bind(&lesson.video_url)
    .bind(lesson.duration_minutes)
    .bind(lesson.sort_order)
    .bind(&lesson.category_id)
    .bind(lesson.tier.as_str())
    .bind(practice_exercise)
    .bind(resources)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    lesson_from_row(&row)
}
