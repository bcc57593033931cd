//! Access gate for lesson content

use wpm_common::db::{Entitlement, Lesson, LessonTier};

/// Whether a user of the given entitlement may open lessons of `tier`
pub fn tier_allows(tier: LessonTier, entitlement: Entitlement) -> bool {
    match tier {
        LessonTier::Free => true,
        LessonTier::Premium => entitlement == Entitlement::Premium,
    }
}

/// Free lessons are open to everyone; premium lessons need a premium entitlement.
///
/// Anonymous callers are passed in as `Entitlement::Free`.
pub fn can_access(lesson: &Lesson, entitlement: Entitlement) -> bool {
    tier_allows(lesson.tier, entitlement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_lessons_open_to_all() {
        assert!(tier_allows(LessonTier::Free, Entitlement::Free));
        assert!(tier_allows(LessonTier::Free, Entitlement::Premium));
    }

    #[test]
    fn test_premium_requires_premium() {
        assert!(!tier_allows(LessonTier::Premium, Entitlement::Free));
        assert!(tier_allows(LessonTier::Premium, Entitlement::Premium));
    }
}
