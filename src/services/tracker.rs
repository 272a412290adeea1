//! Challenge tracker - activity recording and completion evaluation
//!
//! The single mutation entry point for challenge progress. One call to
//! [`ChallengeTracker::record_activity`] runs the full pipeline in order:
//! per-challenge mutation, one wholesale store write, completion
//! evaluation (with its own batched write and one completion event per
//! transition), then a display refresh event.
//!
//! Tracking never blocks learning flows: anonymous identity and storage
//! failures degrade to no-ops reported on the returned outcome, not
//! errors.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::catalog::ChallengeCatalog;
use crate::identity::{Identity, IdentityProvider};
use crate::store::{ProgressMap, ProgressRecord, ProgressStore};
use crate::views::ChallengeView;

use super::analytics::{AnalyticsEvent, AnalyticsSink};
use super::events::{ChallengeEvent, EventBus};

/// Fate of the store write for one recording pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// The full mapping was written back
    Saved,
    /// Nothing changed, so nothing was written
    Skipped,
    /// Anonymous identity; tracking is disabled and nothing was touched
    Anonymous,
    /// Write failed; in-memory state stays correct for this session
    Failed(String),
}

/// What one `record_activity` call did, for caller-side telemetry
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    /// Acting user, `None` when anonymous
    pub user_id: Option<String>,
    /// Challenge ids whose progress advanced this call
    pub updated: Vec<String>,
    /// Challenge ids that reached their goal this call
    pub newly_completed: Vec<String>,
    pub persistence: PersistStatus,
}

impl RecordOutcome {
    fn anonymous() -> Self {
        Self {
            user_id: None,
            updated: Vec::new(),
            newly_completed: Vec::new(),
            persistence: PersistStatus::Anonymous,
        }
    }

    fn skipped(user_id: String) -> Self {
        Self {
            user_id: Some(user_id),
            updated: Vec::new(),
            newly_completed: Vec::new(),
            persistence: PersistStatus::Skipped,
        }
    }
}

/// Challenge tracking service
///
/// Constructed once at application start and shared by `Arc`; there is no
/// ambient global state. Each user's document is loaded into memory on
/// first touch and written back wholesale after every mutating pass.
pub struct ChallengeTracker {
    catalog: ChallengeCatalog,
    store: Arc<ProgressStore>,
    identity: Arc<dyn IdentityProvider>,
    events: Arc<EventBus>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
    cache: Mutex<HashMap<String, ProgressMap>>,
}

impl ChallengeTracker {
    pub fn new(
        catalog: ChallengeCatalog,
        store: Arc<ProgressStore>,
        identity: Arc<dyn IdentityProvider>,
        events: Arc<EventBus>,
        analytics: Option<Arc<dyn AnalyticsSink>>,
    ) -> Self {
        Self {
            catalog,
            store,
            identity,
            events,
            analytics,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Record a unit-magnitude activity
    pub fn record(&self, kind: &str) -> RecordOutcome {
        self.record_activity(kind, 1.0)
    }

    /// Record an activity against every challenge bound to its kind.
    ///
    /// Anonymous identity is a guaranteed no-op. A kind with no bound
    /// challenge (or only frozen ones) writes nothing. Otherwise: one store
    /// write, then completion evaluation, then a display refresh event.
    pub fn record_activity(&self, kind: &str, magnitude: f64) -> RecordOutcome {
        let user_id = match self.identity.current_identity() {
            Identity::Authenticated(id) => id,
            Identity::Anonymous => {
                debug!(kind = %kind, "Anonymous activity, progress not tracked");
                return RecordOutcome::anonymous();
            }
        };

        // Progress is non-decreasing by contract; drop non-positive magnitudes.
        if magnitude <= 0.0 {
            debug!(kind = %kind, magnitude, "Ignoring non-positive activity magnitude");
            return RecordOutcome::skipped(user_id);
        }

        let mut cache = self.lock_cache();
        let records = cache
            .entry(user_id.clone())
            .or_insert_with(|| self.store.load(&user_id));

        let now = Utc::now().timestamp();
        let mut updated = Vec::new();
        for definition in self.catalog.bound_to(kind) {
            let record = records
                .entry(definition.id.clone())
                .or_insert_with(|| ProgressRecord::new(now));

            // Completed challenges are frozen
            if record.completed {
                continue;
            }

            record.progress += magnitude;
            updated.push(definition.id.clone());
        }

        if updated.is_empty() {
            debug!(user = %user_id, kind = %kind, "No challenge advanced, skipping write");
            return RecordOutcome::skipped(user_id);
        }

        debug!(user = %user_id, kind = %kind, magnitude, challenges = updated.len(), "Activity recorded");

        // One write per recording pass, before completion evaluation
        let persistence = self.persist(&user_id, records);
        let newly_completed = self.evaluate_records(&user_id, records);
        self.emit_display_refresh(records);

        RecordOutcome {
            user_id: Some(user_id),
            updated,
            newly_completed,
            persistence,
        }
    }

    /// Promote every goal-reached record to completed, exactly once each.
    ///
    /// Returns the newly completed challenge ids. Also runs automatically
    /// after every recording pass.
    pub fn evaluate(&self, user_id: &str) -> Vec<String> {
        let mut cache = self.lock_cache();
        let records = cache
            .entry(user_id.to_string())
            .or_insert_with(|| self.store.load(user_id));
        self.evaluate_records(user_id, records)
    }

    /// Catalog entries whose window is still open
    pub fn active_challenges(&self) -> Vec<&crate::catalog::ChallengeDefinition> {
        let now = Utc::now();
        self.catalog
            .definitions()
            .iter()
            .filter(|d| d.is_active(now))
            .collect()
    }

    /// Board state for a user: active challenges joined with their records
    pub fn challenge_views(&self, user_id: &str) -> Vec<ChallengeView> {
        let mut cache = self.lock_cache();
        let records = cache
            .entry(user_id.to_string())
            .or_insert_with(|| self.store.load(user_id));
        Self::assemble_views(&self.catalog, records)
    }

    /// Snapshot of a user's raw progress records
    pub fn progress_for(&self, user_id: &str) -> ProgressMap {
        let mut cache = self.lock_cache();
        cache
            .entry(user_id.to_string())
            .or_insert_with(|| self.store.load(user_id))
            .clone()
    }

    pub fn catalog(&self) -> &ChallengeCatalog {
        &self.catalog
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Completion pass over a user's records: flip goal-reached records,
    /// batch one write, then fire one completion event per transition.
    fn evaluate_records(&self, user_id: &str, records: &mut ProgressMap) -> Vec<String> {
        let now = Utc::now().timestamp();
        let mut newly_completed = Vec::new();

        for definition in self.catalog.definitions() {
            let Some(record) = records.get_mut(&definition.id) else {
                continue;
            };
            if record.completed || record.progress < definition.goal {
                continue;
            }

            record.completed = true;
            record.completed_at = Some(now);
            newly_completed.push(definition.id.clone());
        }

        if newly_completed.is_empty() {
            return newly_completed;
        }

        if let Err(e) = self.store.save(user_id, records) {
            warn!(user = %user_id, error = %e, "Completion write failed, keeping in-memory state");
        }

        for id in &newly_completed {
            let Some(definition) = self.catalog.get(id) else {
                continue;
            };
            info!(user = %user_id, challenge = %id, "Challenge completed");
            self.events.emit(ChallengeEvent::Completed {
                challenge_id: definition.id.clone(),
                title: definition.title.clone(),
                reward: definition.reward.clone(),
            });
            if let Some(sink) = &self.analytics {
                sink.track(AnalyticsEvent::challenge_complete(&definition.id, user_id));
            }
        }

        newly_completed
    }

    fn persist(&self, user_id: &str, records: &ProgressMap) -> PersistStatus {
        match self.store.save(user_id, records) {
            Ok(()) => PersistStatus::Saved,
            Err(e) => {
                warn!(user = %user_id, error = %e, "Progress write failed, keeping in-memory state");
                PersistStatus::Failed(e.to_string())
            }
        }
    }

    fn emit_display_refresh(&self, records: &ProgressMap) {
        if self.events.subscriber_count() == 0 {
            return;
        }
        self.events.emit(ChallengeEvent::DisplayRefresh {
            entries: Self::assemble_views(&self.catalog, records),
        });
    }

    fn assemble_views(catalog: &ChallengeCatalog, records: &ProgressMap) -> Vec<ChallengeView> {
        let now = Utc::now();
        catalog
            .definitions()
            .iter()
            .filter(|d| d.is_active(now))
            .map(|d| ChallengeView::assemble(d, records.get(&d.id), now))
            .collect()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, ProgressMap>> {
        // A poisoned lock still holds the last consistent mapping
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
