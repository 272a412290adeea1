//! Byamn Challenges - gamified challenge tracking for the Byamn learning platform
//!
//! Tracks per-user progress against a fixed catalog of learning challenges
//! ("complete 7 lessons this week") and promotes each challenge to
//! completed exactly once when its goal is reached.
//!
//! ## Architecture
//!
//! - **Challenge catalog**: static definitions, expiry stamped at startup
//! - **Progress store**: one JSON document per user in a local sled database
//! - **Challenge tracker**: the single mutation entry point plus completion
//!   evaluation
//! - **Event bus**: broadcast channel carrying completion and board-refresh
//!   events to whatever renderer is attached
//!
//! ## Update pipeline
//!
//! ```text
//! record_activity(kind, magnitude)
//!     │
//!     ├─► per-challenge mutation (in-memory document)
//!     ├─► one wholesale write to the progress store
//!     ├─► completion evaluation (batched write + one event per transition)
//!     └─► display refresh event
//! ```
//!
//! Tracking is best-effort by policy: anonymous sessions are never tracked,
//! and storage failures degrade to logged no-ops so the learning flows that
//! generate the activity are never blocked.
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.local/share/byamn-challenges/
//! ├── progress.sled/         # Per-user progress documents
//! └── config.toml            # Configuration
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod services;
pub mod store;
pub mod views;

// Re-exports
pub use catalog::{
    activity_kinds, ChallengeCatalog, ChallengeCategory, ChallengeDefinition, ChallengePeriod,
};
pub use config::Config;
pub use error::ChallengeError;
pub use identity::{FixedIdentityProvider, Identity, IdentityProvider, GUEST_SENTINEL};
pub use services::{
    AnalyticsEvent, AnalyticsSink, ChallengeEvent, ChallengeTracker, EventBus, PersistStatus,
    RecordOutcome, Services, TracingAnalytics,
};
pub use store::{ProgressMap, ProgressRecord, ProgressState, ProgressStore};
pub use views::ChallengeView;
