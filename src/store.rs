//! Progress store - per-user challenge progress in a local database
//!
//! One JSON document per user, keyed `byamn_challenges_progress_<userId>`,
//! mapping challenge id to progress record. Documents are rewritten
//! wholesale on every save: last writer wins, no merge, no version check.
//!
//! Tracking is best-effort by policy. Read failures (missing key, torn
//! JSON, database errors) degrade to an empty map; write failures are
//! returned to the service layer, which logs them and keeps going.

use serde::{Deserialize, Serialize};
use sled::Db;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ChallengeError;

/// Storage key for a user's progress document
pub fn storage_key(user_id: &str) -> String {
    format!("byamn_challenges_progress_{}", user_id)
}

/// Per-user, per-challenge accumulated progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Accumulated value, non-decreasing
    pub progress: f64,
    /// Monotonic false -> true, never reset
    pub completed: bool,
    /// Unix seconds, set exactly once when `completed` flips
    #[serde(default)]
    pub completed_at: Option<i64>,
    /// Unix seconds of the first qualifying activity
    pub started_at: i64,
}

impl ProgressRecord {
    /// Fresh record for a first qualifying activity
    pub fn new(started_at: i64) -> Self {
        Self {
            progress: 0.0,
            completed: false,
            completed_at: None,
            started_at,
        }
    }

    pub fn state(&self) -> ProgressState {
        if self.completed {
            ProgressState::Completed
        } else if self.progress > 0.0 {
            ProgressState::InProgress
        } else {
            ProgressState::NotStarted
        }
    }
}

/// Lifecycle of a progress record; `Completed` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    NotStarted,
    InProgress,
    Completed,
}

/// A user's full progress document
pub type ProgressMap = BTreeMap<String, ProgressRecord>;

/// Local progress database
pub struct ProgressStore {
    db: Db,
}

impl ProgressStore {
    /// Open or create the progress database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ChallengeError> {
        let db = sled::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Opened progress database");
        Ok(Self { db })
    }

    /// Open an ephemeral database (for testing)
    pub fn open_temporary() -> Result<Self, ChallengeError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Load a user's progress document.
    ///
    /// Absent key, database error, and malformed JSON all yield an empty
    /// map; failures are logged, never surfaced.
    pub fn load(&self, user_id: &str) -> ProgressMap {
        let key = storage_key(user_id);
        match self.db.get(key.as_bytes()) {
            Ok(Some(raw)) => match serde_json::from_slice(&raw) {
                Ok(records) => records,
                Err(e) => {
                    warn!(user = %user_id, error = %e, "Malformed progress document, starting empty");
                    ProgressMap::new()
                }
            },
            Ok(None) => ProgressMap::new(),
            Err(e) => {
                warn!(user = %user_id, error = %e, "Progress read failed, starting empty");
                ProgressMap::new()
            }
        }
    }

    /// Persist a user's full progress document, overwriting prior state
    pub fn save(&self, user_id: &str, records: &ProgressMap) -> Result<(), ChallengeError> {
        let key = storage_key(user_id);
        let value = serde_json::to_vec(records)?;
        self.db.insert(key.as_bytes(), value)?;
        Ok(())
    }

    /// Whether a progress document exists for a user
    pub fn contains(&self, user_id: &str) -> Result<bool, ChallengeError> {
        let key = storage_key(user_id);
        Ok(self.db.contains_key(key.as_bytes())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_namespacing() {
        assert_eq!(storage_key("u1"), "byamn_challenges_progress_u1");
    }

    #[test]
    fn test_load_unknown_user_is_empty() {
        let store = ProgressStore::open_temporary().unwrap();
        assert!(store.load("nobody").is_empty());
        assert!(!store.contains("nobody").unwrap());
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = ProgressStore::open_temporary().unwrap();

        let mut records = ProgressMap::new();
        let mut record = ProgressRecord::new(1_700_000_000);
        record.progress = 3.0;
        records.insert("weekly_study_time".to_string(), record);

        store.save("u1", &records).unwrap();
        assert!(store.contains("u1").unwrap());

        let loaded = store.load("u1");
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_malformed_document_degrades_to_empty() {
        let store = ProgressStore::open_temporary().unwrap();
        store
            .db
            .insert(storage_key("u1").as_bytes(), &b"not json"[..])
            .unwrap();

        assert!(store.load("u1").is_empty());
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let store = ProgressStore::open_temporary().unwrap();

        let mut first = ProgressMap::new();
        first.insert("a".to_string(), ProgressRecord::new(1));
        first.insert("b".to_string(), ProgressRecord::new(2));
        store.save("u1", &first).unwrap();

        let mut second = ProgressMap::new();
        second.insert("a".to_string(), ProgressRecord::new(1));
        store.save("u1", &second).unwrap();

        let loaded = store.load("u1");
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains_key("b"));
    }

    #[test]
    fn test_record_state_transitions() {
        let mut record = ProgressRecord::new(0);
        assert_eq!(record.state(), ProgressState::NotStarted);

        record.progress = 2.5;
        assert_eq!(record.state(), ProgressState::InProgress);

        record.completed = true;
        record.completed_at = Some(10);
        assert_eq!(record.state(), ProgressState::Completed);
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = ProgressRecord::new(1_700_000_000);
        record.progress = 7.0;
        record.completed = true;
        record.completed_at = Some(1_700_000_500);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"progress\":7.0"));
        assert!(json.contains("\"completed\":true"));
        assert!(json.contains("\"completed_at\":1700000500"));

        // Documents written before completion lack completed_at
        let legacy: ProgressRecord =
            serde_json::from_str("{\"progress\":1.0,\"completed\":false,\"started_at\":5}").unwrap();
        assert_eq!(legacy.completed_at, None);
    }
}
