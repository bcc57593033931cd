//! Course services
//!
//! Pure decision logic (access gate, adjacency, aggregation) with thin async
//! wrappers that load their inputs from the stores in `crate::db`.

pub mod access;
pub mod lesson_view;
pub mod navigation;
pub mod stats;

pub use access::can_access;
pub use lesson_view::{lesson_view, LessonSummary, LessonView};
pub use navigation::{adjacent, Adjacent};
pub use stats::{CategoryProgress, Dashboard, OverallStats};

#[cfg(test)]
pub(crate) mod fixtures {
    use wpm_common::db::{
        Category, Lesson, LessonTier, ProgressRecord, ProgressStatus,
    };
    use wpm_common::time;

    pub fn sample_category(id: &str, sort_order: i64) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            slug: id.to_string(),
            description: None,
            sort_order,
            created_at: time::now(),
        }
    }

    pub fn sample_lesson(id: &str, category_id: &str, sort_order: i64) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: id.to_string(),
            slug: id.to_string(),
            description: None,
            content: Some(format!("# {}", id)),
            video_url: None,
            duration_minutes: Some(30),
            sort_order,
            category_id: category_id.to_string(),
            tier: LessonTier::Free,
            practice_exercise: None,
            resources: None,
            created_at: time::now(),
            updated_at: time::now(),
        }
    }

    pub fn sample_progress(lesson_id: &str, status: ProgressStatus) -> ProgressRecord {
        ProgressRecord {
            id: format!("p-{}", lesson_id),
            user_id: "u1".to_string(),
            lesson_id: lesson_id.to_string(),
            status,
            progress_percentage: if status == ProgressStatus::Completed { 100 } else { 40 },
            completed_at: (status == ProgressStatus::Completed).then(time::now),
            created_at: time::now(),
            updated_at: time::now(),
        }
    }
}
