//! Aggregation over curriculum, progress and achievements
//!
//! Nothing here is stored. Every view is recomputed from the stores on each
//! call; the `compute_*` functions hold the arithmetic and take plain slices
//! so they can be tested without a database.

use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use wpm_common::config::StatsConfig;
use wpm_common::db::{
    Achievement, AchievementKind, Category, Lesson, ProgressRecord, ProgressStatus,
};
use wpm_common::Result;

use crate::db::{achievements, curriculum, progress};

/// Course-wide totals for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    pub total_lessons: usize,
    pub completed_lessons: usize,
    /// Rounded to the nearest whole percent
    pub overall_progress: u32,
    pub streak: u32,
    pub certificates: u32,
}

/// Completion rollup for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProgress {
    pub category_id: String,
    pub completed: usize,
    pub total: usize,
    /// Unrounded, 0.0 for an empty category
    pub percentage: f64,
}

/// Everything the dashboard page renders
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub categories: Vec<Category>,
    pub lessons: Vec<Lesson>,
    pub progress: Vec<ProgressRecord>,
    pub achievements: Vec<Achievement>,
    pub stats: OverallStats,
    pub category_progress: Vec<CategoryProgress>,
    pub resume_lesson: Option<Lesson>,
}

fn count_kind(achievements: &[Achievement], kind: AchievementKind) -> u32 {
    achievements.iter().filter(|a| a.kind == kind).count() as u32
}

fn completed_lesson_ids(progress: &[ProgressRecord]) -> Vec<&str> {
    progress
        .iter()
        .filter(|p| p.status == ProgressStatus::Completed)
        .map(|p| p.lesson_id.as_str())
        .collect()
}

pub fn compute_overall_stats(
    lessons: &[Lesson],
    progress: &[ProgressRecord],
    achievements: &[Achievement],
    config: &StatsConfig,
) -> OverallStats {
    let total_lessons = lessons.len();
    let completed_lessons = completed_lesson_ids(progress).len();

    let overall_progress = if total_lessons == 0 {
        0
    } else {
        (100.0 * completed_lessons as f64 / total_lessons as f64).round() as u32
    };

    let streak = match (count_kind(achievements, AchievementKind::Streak), config.streak_fallback) {
        (0, Some(fallback)) => fallback,
        (count, _) => count,
    };

    OverallStats {
        total_lessons,
        completed_lessons,
        overall_progress,
        streak,
        certificates: count_kind(achievements, AchievementKind::Certificate),
    }
}

pub fn compute_category_progress(
    category_id: &str,
    lessons: &[Lesson],
    progress: &[ProgressRecord],
) -> CategoryProgress {
    let completed_ids = completed_lesson_ids(progress);
    let in_category: Vec<&Lesson> = lessons.iter().filter(|l| l.category_id == category_id).collect();

    let total = in_category.len();
    let completed = in_category
        .iter()
        .filter(|l| completed_ids.contains(&l.id.as_str()))
        .count();

    let percentage = if total > 0 {
        100.0 * completed as f64 / total as f64
    } else {
        0.0
    };

    CategoryProgress {
        category_id: category_id.to_string(),
        completed,
        total,
        percentage,
    }
}

/// Lessons in curriculum order: category position first, then lesson position
///
/// `categories` must already be in display order. Lessons of unlisted
/// categories are dropped.
fn curriculum_order<'a>(categories: &[Category], lessons: &'a [Lesson]) -> Vec<&'a Lesson> {
    let position: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.as_str(), i))
        .collect();

    let mut ordered: Vec<(usize, &Lesson)> = lessons
        .iter()
        .filter_map(|l| position.get(l.category_id.as_str()).map(|&p| (p, l)))
        .collect();
    ordered.sort_by(|(pa, a), (pb, b)| {
        pa.cmp(pb)
            .then(a.sort_order.cmp(&b.sort_order))
            .then_with(|| a.id.cmp(&b.id))
    });

    ordered.into_iter().map(|(_, l)| l).collect()
}

/// Lesson the user should pick up next
///
/// The first in-progress lesson in curriculum order, else the first lesson
/// not yet completed.
pub fn compute_resume_lesson(
    categories: &[Category],
    lessons: &[Lesson],
    progress: &[ProgressRecord],
) -> Option<Lesson> {
    let status: HashMap<&str, ProgressStatus> = progress
        .iter()
        .map(|p| (p.lesson_id.as_str(), p.status))
        .collect();
    let ordered = curriculum_order(categories, lessons);

    ordered
        .iter()
        .find(|l| status.get(l.id.as_str()) == Some(&ProgressStatus::InProgress))
        .or_else(|| {
            ordered
                .iter()
                .find(|l| status.get(l.id.as_str()) != Some(&ProgressStatus::Completed))
        })
        .map(|l| (*l).clone())
}

pub async fn overall_stats(
    pool: &SqlitePool,
    user_id: &str,
    config: &StatsConfig,
) -> Result<OverallStats> {
    let (lessons, progress, achievements) = tokio::try_join!(
        curriculum::list_lessons(pool, None),
        progress::list_progress(pool, user_id),
        achievements::list_achievements(pool, user_id),
    )?;

    Ok(compute_overall_stats(&lessons, &progress, &achievements, config))
}

pub async fn category_progress(
    pool: &SqlitePool,
    user_id: &str,
    category_id: &str,
) -> Result<CategoryProgress> {
    let (lessons, progress) = tokio::try_join!(
        curriculum::list_lessons(pool, Some(category_id)),
        progress::list_progress(pool, user_id),
    )?;

    Ok(compute_category_progress(category_id, &lessons, &progress))
}

/// Rollups for every category, in category order
pub async fn all_category_progress(pool: &SqlitePool, user_id: &str) -> Result<Vec<CategoryProgress>> {
    let (categories, lessons, progress) = tokio::try_join!(
        curriculum::list_categories(pool),
        curriculum::list_lessons(pool, None),
        progress::list_progress(pool, user_id),
    )?;

    Ok(categories
        .iter()
        .map(|c| compute_category_progress(&c.id, &lessons, &progress))
        .collect())
}

pub async fn resume_lesson(pool: &SqlitePool, user_id: &str) -> Result<Option<Lesson>> {
    let (categories, lessons, progress) = tokio::try_join!(
        curriculum::list_categories(pool),
        curriculum::list_lessons(pool, None),
        progress::list_progress(pool, user_id),
    )?;

    Ok(compute_resume_lesson(&categories, &lessons, &progress))
}

pub async fn dashboard(pool: &SqlitePool, user_id: &str, config: &StatsConfig) -> Result<Dashboard> {
    let (categories, lessons, progress, achievements) = tokio::try_join!(
        curriculum::list_categories(pool),
        curriculum::list_lessons(pool, None),
        progress::list_progress(pool, user_id),
        achievements::list_achievements(pool, user_id),
    )?;

    let stats = compute_overall_stats(&lessons, &progress, &achievements, config);
    let category_progress = categories
        .iter()
        .map(|c| compute_category_progress(&c.id, &lessons, &progress))
        .collect();
    let resume_lesson = compute_resume_lesson(&categories, &lessons, &progress);

    Ok(Dashboard {
        categories,
        lessons,
        progress,
        achievements,
        stats,
        category_progress,
        resume_lesson,
    })
}
