//! Event surface toward the UI renderer
//!
//! The tracker never touches the DOM, notification, or confetti layers
//! directly; it broadcasts events and whatever renderer is attached reacts.
//! Useful for:
//! - Completion toasts and celebration animations
//! - Challenge board refresh
//! - Audit logging

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use crate::views::ChallengeView;

/// Events emitted by the challenge tracker
#[derive(Debug, Clone)]
pub enum ChallengeEvent {
    /// A challenge reached its goal; fired at most once per (user, challenge)
    Completed {
        challenge_id: String,
        title: String,
        reward: String,
    },
    /// The active challenge list changed; carries the full board state
    DisplayRefresh { entries: Vec<ChallengeView> },
}

/// Trait for event listeners
pub trait EventListener: Send + Sync {
    /// Handle an event
    fn on_event(&self, event: &ChallengeEvent);
}

/// Event bus for broadcasting challenge events
pub struct EventBus {
    sender: broadcast::Sender<ChallengeEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new event bus with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: ChallengeEvent) {
        trace!(event = ?event, "Emitting challenge event");
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ChallengeEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging event listener for audit trails
pub struct LoggingEventListener;

impl EventListener for LoggingEventListener {
    fn on_event(&self, event: &ChallengeEvent) {
        match event {
            ChallengeEvent::Completed {
                challenge_id,
                title,
                reward,
            } => {
                info!(challenge = %challenge_id, title = %title, reward = %reward, "Challenge completed");
            }
            ChallengeEvent::DisplayRefresh { entries } => {
                debug!(entries = entries.len(), "Challenge board refreshed");
            }
        }
    }
}

/// Spawn a background task that logs all events
pub fn spawn_logging_listener(event_bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
    let mut receiver = event_bus.subscribe();
    let listener = LoggingEventListener;

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => listener.on_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Event listener lagged, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed, stopping listener");
                    break;
                }
            }
        }
    })
}
