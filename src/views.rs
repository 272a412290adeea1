//! View types for the display boundary
//!
//! These types use camelCase serialization for UI clients. Wire types in
//! store.rs use snake_case for storage compatibility. Views are
//! non-authoritative: pure reads over the catalog and a progress document,
//! never a mutation path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{ChallengeCategory, ChallengeDefinition, ChallengePeriod};
use crate::store::{ProgressRecord, ProgressState};

/// Completion percentage, clamped to 100 for over-completion
pub fn progress_percentage(progress: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 100.0;
    }
    (progress / goal * 100.0).min(100.0)
}

/// Whole days until expiry: ceiling of the remaining time, floored at 0
pub fn days_until_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = expires_at.signed_duration_since(now);
    let secs = remaining.num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs + 86_399) / 86_400
}

/// One challenge as presented on the challenge board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal: f64,
    pub unit: String,
    pub category: ChallengeCategory,
    pub period: ChallengePeriod,
    pub reward: String,
    pub expires_at: DateTime<Utc>,
    pub days_until_expiry: i64,
    pub progress: f64,
    pub progress_percentage: f64,
    pub completed: bool,
    pub state: ProgressState,
}

impl ChallengeView {
    /// Join a definition with the user's record (if any) at `now`
    pub fn assemble(
        definition: &ChallengeDefinition,
        record: Option<&ProgressRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        let progress = record.map(|r| r.progress).unwrap_or(0.0);
        let state = record.map(|r| r.state()).unwrap_or(ProgressState::NotStarted);

        Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            goal: definition.goal,
            unit: definition.unit.clone(),
            category: definition.category,
            period: definition.period,
            reward: definition.reward.clone(),
            expires_at: definition.expires_at,
            days_until_expiry: days_until_expiry(definition.expires_at, now),
            progress,
            progress_percentage: progress_percentage(progress, definition.goal),
            completed: state == ProgressState::Completed,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ChallengeCatalog;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_percentage_clamps_at_100() {
        assert_eq!(progress_percentage(3.0, 5.0), 60.0);
        assert_eq!(progress_percentage(7.0, 5.0), 100.0);
        assert_eq!(progress_percentage(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_days_until_expiry_ceils_and_floors() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

        // 6 days and one second remaining rounds up to 7
        assert_eq!(days_until_expiry(now + Duration::days(7), now + Duration::seconds(86_399)), 7);
        assert_eq!(days_until_expiry(now + Duration::days(7), now), 7);
        // Already expired floors at 0
        assert_eq!(days_until_expiry(now, now + Duration::days(2)), 0);
        assert_eq!(days_until_expiry(now, now), 0);
    }

    #[test]
    fn test_assemble_without_record() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let catalog = ChallengeCatalog::initialize_at(now);
        let def = catalog.get("weekly_lesson_streak").unwrap();

        let view = ChallengeView::assemble(def, None, now);
        assert_eq!(view.progress, 0.0);
        assert_eq!(view.progress_percentage, 0.0);
        assert_eq!(view.state, ProgressState::NotStarted);
        assert_eq!(view.days_until_expiry, 7);
        assert!(!view.completed);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let catalog = ChallengeCatalog::initialize_at(now);
        let def = catalog.get("weekly_study_time").unwrap();

        let mut record = ProgressRecord::new(now.timestamp());
        record.progress = 7.0;
        record.completed = true;
        record.completed_at = Some(now.timestamp());

        let view = ChallengeView::assemble(def, Some(&record), now);
        assert_eq!(view.progress_percentage, 100.0);

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"progressPercentage\":100.0"));
        assert!(json.contains("\"daysUntilExpiry\":7"));
        assert!(json.contains("\"state\":\"completed\""));
    }
}
