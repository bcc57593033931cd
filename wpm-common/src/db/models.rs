//! Database models

use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visibility tier of a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonTier {
    Free,
    Premium,
}

/// Entitlement tier of a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entitlement {
    #[default]
    Free,
    Premium,
}

/// Per-lesson status of a progress record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Streak,
    Certificate,
    Completion,
}

/// Maps a text-backed enum to and from its stored column value.
macro_rules! text_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(Error::InvalidInput(format!(
                        "unknown {} value '{}'",
                        stringify!($ty),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(LessonTier { Free => "free", Premium => "premium" });
text_enum!(Entitlement { Free => "free", Premium => "premium" });
text_enum!(ProgressStatus {
    NotStarted => "not_started",
    InProgress => "in_progress",
    Completed => "completed",
});
text_enum!(AchievementKind {
    Streak => "streak",
    Certificate => "certificate",
    Completion => "completion",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// Hands-on exercise attached to a lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeExercise {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// Markdown body
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration_minutes: Option<i64>,
    /// Position within the owning category
    pub sort_order: i64,
    pub category_id: String,
    pub tier: LessonTier,
    pub practice_exercise: Option<PracticeExercise>,
    pub resources: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-(user, lesson) completion state
///
/// A missing record means the lesson was never started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: String,
    pub user_id: String,
    pub lesson_id: String,
    pub status: ProgressStatus,
    pub progress_percentage: i64,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub kind: AchievementKind,
    pub name: String,
    pub description: Option<String>,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub entitlement: Entitlement,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
