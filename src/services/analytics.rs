//! Best-effort analytics emission
//!
//! Completion milestones are worth counting, but losing one must never
//! affect tracking: delivery is fire-and-forget, the sink is optional, and
//! a sink must not block or panic.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Event name emitted when a challenge completes
pub const CHALLENGE_COMPLETE: &str = "challenge_complete";

/// A single analytics event
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    /// Unique id for downstream dedup
    pub event_id: String,
    pub name: String,
    pub challenge_id: String,
    pub user_id: String,
}

impl AnalyticsEvent {
    /// Completion event for a (user, challenge) pair
    pub fn challenge_complete(challenge_id: &str, user_id: &str) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            name: CHALLENGE_COMPLETE.to_string(),
            challenge_id: challenge_id.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

/// Destination for analytics events
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

/// Sink that writes events to the log stream
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        info!(
            event = %event.name,
            event_id = %event.event_id,
            challenge = %event.challenge_id,
            user = %event.user_id,
            "Analytics event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Sink that records events for assertions
    pub(crate) struct RecordingSink {
        pub events: Mutex<Vec<AnalyticsEvent>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnalyticsSink for RecordingSink {
        fn track(&self, event: AnalyticsEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_completion_event_shape() {
        let event = AnalyticsEvent::challenge_complete("weekly_lesson_streak", "u1");
        assert_eq!(event.name, CHALLENGE_COMPLETE);
        assert_eq!(event.challenge_id, "weekly_lesson_streak");
        assert_eq!(event.user_id, "u1");
        assert!(!event.event_id.is_empty());
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = AnalyticsEvent::challenge_complete("c", "u");
        let b = AnalyticsEvent::challenge_complete("c", "u");
        assert_ne!(a.event_id, b.event_id);
    }

    #[test]
    fn test_recording_sink_collects() {
        let sink = RecordingSink::new();
        sink.track(AnalyticsEvent::challenge_complete("c1", "u1"));
        sink.track(AnalyticsEvent::challenge_complete("c2", "u1"));
        assert_eq!(sink.events.lock().unwrap().len(), 2);
    }
}
