//! Lesson page assembly
//!
//! Combines the access gate, navigation and the user's progress record into
//! the single payload the lesson page renders. Locked lessons keep their
//! metadata but lose body content, video, exercise and resources.

use serde::Serialize;
use sqlx::SqlitePool;
use wpm_common::db::{Lesson, LessonTier, ProgressRecord, User};
use wpm_common::Result;

use super::{access, navigation};
use crate::db::{curriculum, progress};

/// Navigation link to a neighbouring lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub tier: LessonTier,
    pub duration_minutes: Option<i64>,
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.clone(),
            slug: lesson.slug.clone(),
            title: lesson.title.clone(),
            tier: lesson.tier,
            duration_minutes: lesson.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonView {
    pub lesson: Lesson,
    pub locked: bool,
    pub progress: Option<ProgressRecord>,
    pub previous: Option<LessonSummary>,
    pub next: Option<LessonSummary>,
}

/// Strip everything a locked lesson must not reveal
pub fn redact(mut lesson: Lesson) -> Lesson {
    lesson.content = None;
    lesson.video_url = None;
    lesson.practice_exercise = None;
    lesson.resources = None;
    lesson
}

/// Build the lesson page for `slug` as seen by `user`
///
/// Returns `None` if no lesson has that slug.
pub async fn lesson_view(pool: &SqlitePool, slug: &str, user: &User) -> Result<Option<LessonView>> {
    let Some(lesson) = curriculum::get_lesson_by_slug(pool, slug).await? else {
        return Ok(None);
    };

    let (adjacent, progress) = tokio::try_join!(
        navigation::adjacent(pool, &lesson.id),
        progress::get_progress(pool, &user.id, &lesson.id),
    )?;

    let locked = !access::can_access(&lesson, user.entitlement);
    let lesson = if locked { redact(lesson) } else { lesson };

    Ok(Some(LessonView {
        lesson,
        locked,
        progress,
        previous: adjacent.previous.as_ref().map(LessonSummary::from),
        next: adjacent.next.as_ref().map(LessonSummary::from),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::curriculum::test_support::{category, lesson};
    use crate::db::progress::{upsert_progress, ProgressUpdate};
    use crate::db::users::{ensure_user, set_entitlement};
    use wpm_common::db::{init_memory_database, Entitlement, ProgressStatus};

    async fn setup() -> SqlitePool {
        let pool = init_memory_database().await.unwrap();
        let themes = category(&pool, "themes", 4).await;
        lesson(&pool, &themes.id, "theme-basics", 1, LessonTier::Free).await;
        lesson(&pool, &themes.id, "child-themes", 2, LessonTier::Premium).await;
        lesson(&pool, &themes.id, "block-themes", 3, LessonTier::Premium).await;
        pool
    }

    #[tokio::test]
    async fn test_premium_lesson_locked_for_free_user() {
        let pool = setup().await;
        let user = ensure_user(&pool, "free-user").await.unwrap();

        let view = lesson_view(&pool, "child-themes", &user).await.unwrap().unwrap();
        assert!(view.locked);
        assert!(view.lesson.content.is_none());
        assert_eq!(view.lesson.title, "child themes");
        assert_eq!(view.previous.unwrap().slug, "theme-basics");
        assert_eq!(view.next.unwrap().slug, "block-themes");
    }

    #[tokio::test]
    async fn test_premium_user_sees_content_and_progress() {
        let pool = setup().await;
        ensure_user(&pool, "pro").await.unwrap();
        let user = set_entitlement(&pool, "pro", Entitlement::Premium).await.unwrap();

        let target = curriculum::get_lesson_by_slug(&pool, "child-themes").await.unwrap().unwrap();
        upsert_progress(
            &pool,
            "pro",
            &target.id,
            ProgressUpdate {
                status: ProgressStatus::InProgress,
                progress_percentage: 45,
            },
        )
        .await
        .unwrap();

        let view = lesson_view(&pool, "child-themes", &user).await.unwrap().unwrap();
        assert!(!view.locked);
        assert_eq!(view.lesson.content.as_deref(), Some("# child-themes"));
        assert_eq!(view.progress.unwrap().progress_percentage, 45);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_none() {
        let pool = setup().await;
        let user = ensure_user(&pool, "u1").await.unwrap();
        assert!(lesson_view(&pool, "missing", &user).await.unwrap().is_none());
    }
}
