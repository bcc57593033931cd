//! Bundled curriculum and demo accounts
//!
//! The course content ships inside the binary. Seeding is idempotent:
//! categories and lessons whose slug already exists are left untouched, so
//! the seed can run on every startup.

use serde::Deserialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info};
use wpm_common::db::{AchievementKind, Entitlement, LessonTier, PracticeExercise};
use wpm_common::{Error, Result};

use crate::db::{achievements, curriculum, users, NewCategory, NewLesson};

const CURRICULUM_JSON: &str = include_str!("../data/curriculum.json");

/// Demo account with free entitlement
pub const DEMO_FREE_USER: &str = "demo-free";

/// Demo account with premium entitlement
pub const DEMO_PREMIUM_USER: &str = "demo-premium";

#[derive(Debug, Deserialize)]
struct CurriculumFile {
    categories: Vec<CategorySeed>,
    lessons: Vec<LessonSeed>,
}

#[derive(Debug, Deserialize)]
struct CategorySeed {
    slug: String,
    name: String,
    description: Option<String>,
    sort_order: i64,
}

#[derive(Debug, Deserialize)]
struct LessonSeed {
    slug: String,
    /// Slug of the owning category
    category: String,
    title: String,
    description: Option<String>,
    content: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    duration_minutes: Option<i64>,
    sort_order: i64,
    tier: LessonTier,
    #[serde(default)]
    practice_exercise: Option<PracticeExercise>,
    #[serde(default)]
    resources: Option<serde_json::Value>,
}

/// Counts of rows created by one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub lessons_created: usize,
    pub users_created: usize,
}

/// Load the bundled curriculum and demo users
pub async fn seed(pool: &SqlitePool) -> Result<SeedReport> {
    let file: CurriculumFile = serde_json::from_str(CURRICULUM_JSON)?;
    let mut report = SeedReport::default();

    let mut category_ids: HashMap<String, String> = HashMap::new();
    for entry in &file.categories {
        let category = match curriculum::get_category_by_slug(pool, &entry.slug).await? {
            Some(existing) => existing,
            None => {
                report.categories_created += 1;
                curriculum::create_category(
                    pool,
                    &NewCategory {
                        name: entry.name.clone(),
                        slug: entry.slug.clone(),
                        description: entry.description.clone(),
                        sort_order: entry.sort_order,
                    },
                )
                .await?
            }
        };
        category_ids.insert(category.slug, category.id);
    }

    for entry in file.lessons {
        if curriculum::get_lesson_by_slug(pool, &entry.slug).await?.is_some() {
            debug!("Lesson {} already present", entry.slug);
            continue;
        }

        let category_id = category_ids.get(&entry.category).cloned().ok_or_else(|| {
            Error::InvalidInput(format!(
                "lesson {} references unknown category {}",
                entry.slug, entry.category
            ))
        })?;

        curriculum::create_lesson(
            pool,
            &NewLesson {
                title: entry.title,
                slug: entry.slug,
                description: entry.description,
                content: entry.content,
                video_url: entry.video_url,
                duration_minutes: entry.duration_minutes,
                sort_order: entry.sort_order,
                category_id,
                tier: entry.tier,
                practice_exercise: entry.practice_exercise,
                resources: entry.resources,
            },
        )
        .await?;
        report.lessons_created += 1;
    }

    report.users_created += seed_demo_user(pool, DEMO_FREE_USER, Entitlement::Free).await?;
    report.users_created += seed_demo_user(pool, DEMO_PREMIUM_USER, Entitlement::Premium).await?;

    info!(
        "Seed complete: {} categories, {} lessons, {} users created",
        report.categories_created, report.lessons_created, report.users_created
    );

    Ok(report)
}

async fn seed_demo_user(pool: &SqlitePool, id: &str, entitlement: Entitlement) -> Result<usize> {
    if users::get_user(pool, id).await?.is_some() {
        return Ok(0);
    }

    users::ensure_user(pool, id).await?;
    users::set_entitlement(pool, id, entitlement).await?;

    if entitlement == Entitlement::Premium {
        achievements::create_achievement(
            pool,
            id,
            AchievementKind::Streak,
            "Three Day Streak",
            Some("Studied three days in a row"),
        )
        .await?;
        achievements::create_achievement(
            pool,
            id,
            AchievementKind::Certificate,
            "WordPress Fundamentals",
            Some("Completed every fundamentals lesson"),
        )
        .await?;
    }

    Ok(1)
}
