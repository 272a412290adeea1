//! Challenge catalog - the fixed set of tracked challenges
//!
//! Definitions are static configuration: rebuilt fresh on every process
//! start, never persisted, never versioned. Expiry is stamped once at
//! construction time from the wall clock; a long-lived process keeps the
//! original window (no rotation on calendar boundaries).

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Activity kinds the platform reports to the tracker
pub mod activity_kinds {
    pub const LESSON_COMPLETE: &str = "lesson_complete";
    pub const STUDY_TIME: &str = "study_time";
    pub const QUIZ_COMPLETE: &str = "quiz_complete";
    pub const COURSE_COMPLETE: &str = "course_complete";
    pub const JOURNAL_ENTRY: &str = "journal_entry";
    pub const FLASHCARD_REVIEW: &str = "flashcard_review";

    /// All known activity kinds
    pub const ALL: [&str; 6] = [
        LESSON_COMPLETE,
        STUDY_TIME,
        QUIZ_COMPLETE,
        COURSE_COMPLETE,
        JOURNAL_ENTRY,
        FLASHCARD_REVIEW,
    ];
}

/// Nominal challenge window, drives expiry computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengePeriod {
    Weekly,
    Monthly,
}

impl ChallengePeriod {
    /// Expiry instant for a window opening at `now`.
    ///
    /// Weekly is a flat 7 days; monthly is one calendar month, falling back
    /// to 30 days at the unrepresentable end of the calendar range.
    pub fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ChallengePeriod::Weekly => now + Duration::days(7),
            ChallengePeriod::Monthly => now
                .checked_add_months(Months::new(1))
                .unwrap_or_else(|| now + Duration::days(30)),
        }
    }
}

/// Display grouping for the challenge board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeCategory {
    Consistency,
    Focus,
    Practice,
    Milestone,
    Reflection,
}

/// A single tracked challenge definition
#[derive(Debug, Clone)]
pub struct ChallengeDefinition {
    /// Unique key, also the key of the per-user progress record
    pub id: String,
    pub title: String,
    pub description: String,
    /// Positive threshold at which the challenge completes
    pub goal: f64,
    /// Display label for the progress unit ("lessons", "hours")
    pub unit: String,
    pub category: ChallengeCategory,
    pub period: ChallengePeriod,
    /// Display copy carried on the completion event
    pub reward: String,
    /// Stamped once at catalog construction, never recomputed
    pub expires_at: DateTime<Utc>,
    /// Activity kinds that count toward this challenge
    pub activity_bindings: Vec<String>,
}

impl ChallengeDefinition {
    /// Whether the challenge window is still open at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Whether an activity kind counts toward this challenge
    pub fn counts_activity(&self, kind: &str) -> bool {
        self.activity_bindings.iter().any(|b| b == kind)
    }
}

/// The fixed, ordered challenge catalog
pub struct ChallengeCatalog {
    definitions: Vec<ChallengeDefinition>,
}

impl ChallengeCatalog {
    /// Build the catalog, stamping expiry from the current wall clock
    pub fn initialize() -> Self {
        Self::initialize_at(Utc::now())
    }

    /// Build the catalog with a fixed clock (for testing)
    pub fn initialize_at(now: DateTime<Utc>) -> Self {
        let def = |id: &str,
                   title: &str,
                   description: &str,
                   goal: f64,
                   unit: &str,
                   category: ChallengeCategory,
                   period: ChallengePeriod,
                   reward: &str,
                   bindings: &[&str]| ChallengeDefinition {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            goal,
            unit: unit.to_string(),
            category,
            period,
            reward: reward.to_string(),
            expires_at: period.expiry_from(now),
            activity_bindings: bindings.iter().map(|b| b.to_string()).collect(),
        };

        let definitions = vec![
            def(
                "weekly_lesson_streak",
                "Lesson Streak",
                "Complete 7 lessons this week",
                7.0,
                "lessons",
                ChallengeCategory::Consistency,
                ChallengePeriod::Weekly,
                "Streak Spark badge",
                &[activity_kinds::LESSON_COMPLETE],
            ),
            def(
                "weekly_study_time",
                "Deep Focus",
                "Log 5 hours of study time this week",
                5.0,
                "hours",
                ChallengeCategory::Focus,
                ChallengePeriod::Weekly,
                "Deep Focus badge + 50 points",
                &[activity_kinds::STUDY_TIME],
            ),
            def(
                "weekly_quiz_master",
                "Quiz Master",
                "Finish 10 quizzes this week",
                10.0,
                "quizzes",
                ChallengeCategory::Practice,
                ChallengePeriod::Weekly,
                "Quiz Master badge",
                &[activity_kinds::QUIZ_COMPLETE],
            ),
            def(
                "weekly_flashcard_review",
                "Card Shark",
                "Review 50 flashcards this week",
                50.0,
                "cards",
                ChallengeCategory::Practice,
                ChallengePeriod::Weekly,
                "Card Shark badge",
                &[activity_kinds::FLASHCARD_REVIEW],
            ),
            def(
                "weekly_momentum",
                "Momentum",
                "Complete 12 learning activities of any kind this week",
                12.0,
                "activities",
                ChallengeCategory::Consistency,
                ChallengePeriod::Weekly,
                "Momentum badge + 25 points",
                &[
                    activity_kinds::LESSON_COMPLETE,
                    activity_kinds::QUIZ_COMPLETE,
                    activity_kinds::FLASHCARD_REVIEW,
                ],
            ),
            def(
                "monthly_course_complete",
                "Course Finisher",
                "Finish a full course this month",
                1.0,
                "courses",
                ChallengeCategory::Milestone,
                ChallengePeriod::Monthly,
                "Finisher trophy + 200 points",
                &[activity_kinds::COURSE_COMPLETE],
            ),
            def(
                "monthly_journal_entries",
                "Reflective Mind",
                "Write 8 journal reflections this month",
                8.0,
                "entries",
                ChallengeCategory::Reflection,
                ChallengePeriod::Monthly,
                "Reflective Mind badge",
                &[activity_kinds::JOURNAL_ENTRY],
            ),
        ];

        Self { definitions }
    }

    /// All definitions in catalog order
    pub fn definitions(&self) -> &[ChallengeDefinition] {
        &self.definitions
    }

    /// Look up a definition by id
    pub fn get(&self, id: &str) -> Option<&ChallengeDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Definitions subscribed to an activity kind, in catalog order
    pub fn bound_to<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ChallengeDefinition> {
        self.definitions.iter().filter(move |d| d.counts_activity(kind))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
