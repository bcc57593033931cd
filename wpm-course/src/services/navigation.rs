//! Previous/next traversal within a category

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;
use wpm_common::db::Lesson;
use wpm_common::Result;

use crate::db::curriculum;

/// Neighbours of a lesson inside its category
#[derive(Debug, Clone, Default, Serialize)]
pub struct Adjacent {
    pub previous: Option<Lesson>,
    pub next: Option<Lesson>,
}

/// Locate `lesson_id` in an ordered sibling list and return its neighbours
///
/// Returns `None` if the lesson is not in the list.
pub fn resolve_adjacent(siblings: &[Lesson], lesson_id: &str) -> Option<Adjacent> {
    let index = siblings.iter().position(|l| l.id == lesson_id)?;
    Some(Adjacent {
        previous: index.checked_sub(1).and_then(|i| siblings.get(i)).cloned(),
        next: siblings.get(index + 1).cloned(),
    })
}

/// Previous and next lesson of `lesson_id` in its category
///
/// An unknown lesson, a dangling category reference or a lesson missing
/// from its category's listing all resolve to no neighbours.
pub async fn adjacent(pool: &SqlitePool, lesson_id: &str) -> Result<Adjacent> {
    let Some(lesson) = curriculum::get_lesson_by_id(pool, lesson_id).await? else {
        return Ok(Adjacent::default());
    };

    if curriculum::get_category(pool, &lesson.category_id).await?.is_none() {
        warn!(
            "Lesson {} references missing category {}",
            lesson.id, lesson.category_id
        );
        return Ok(Adjacent::default());
    }

    let siblings = curriculum::list_lessons(pool, Some(&lesson.category_id)).await?;
    match resolve_adjacent(&siblings, &lesson.id) {
        Some(adjacent) => Ok(adjacent),
        None => {
            warn!(
                "Lesson {} not found in listing of category {}",
                lesson.id, lesson.category_id
            );
            Ok(Adjacent::default())
        }
    }
}
