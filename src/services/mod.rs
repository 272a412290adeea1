//! Service layer for byamn-challenges
//!
//! Services sit between the embedding application and the progress store:
//! - Activity recording and completion evaluation
//! - Event emission toward the UI renderer
//! - Best-effort analytics
//!
//! ## Architecture
//!
//! ```text
//! Platform UI / CLI (thin)
//!     ↓
//! ChallengeTracker (business logic)
//!     ↓
//! ProgressStore (store.rs)
//!     ↓
//! sled database
//! ```

pub mod analytics;
pub mod events;
pub mod tracker;

// Re-exports
pub use analytics::{AnalyticsEvent, AnalyticsSink, TracingAnalytics};
pub use events::{ChallengeEvent, EventBus, EventListener};
pub use tracker::{ChallengeTracker, PersistStatus, RecordOutcome};

use std::sync::Arc;

use crate::catalog::ChallengeCatalog;
use crate::identity::IdentityProvider;
use crate::store::ProgressStore;

/// Service container for dependency injection
///
/// Holds the tracker and its event bus, constructed once at application
/// start and passed by reference to callers. Replaces the ambient global
/// lookup the feature historically used.
pub struct Services {
    pub tracker: Arc<ChallengeTracker>,
    pub events: Arc<EventBus>,
}

impl Services {
    /// Create services with default event bus and no analytics
    pub fn new(store: Arc<ProgressStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::build(store, identity, Arc::new(EventBus::new()), None)
    }

    /// Create services with explicit event bus and analytics wiring
    pub fn build(
        store: Arc<ProgressStore>,
        identity: Arc<dyn IdentityProvider>,
        events: Arc<EventBus>,
        analytics: Option<Arc<dyn AnalyticsSink>>,
    ) -> Self {
        let catalog = ChallengeCatalog::initialize();
        let tracker = Arc::new(ChallengeTracker::new(
            catalog,
            store,
            identity,
            events.clone(),
            analytics,
        ));

        Self { tracker, events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::activity_kinds;
    use crate::identity::FixedIdentityProvider;

    #[test]
    fn test_container_wires_shared_bus() {
        let store = Arc::new(ProgressStore::open_temporary().unwrap());
        let services = Services::new(store, FixedIdentityProvider::authenticated("u1"));

        let mut receiver = services.events.subscribe();
        services.tracker.record(activity_kinds::LESSON_COMPLETE);

        assert!(receiver.try_recv().is_ok());
    }
}
