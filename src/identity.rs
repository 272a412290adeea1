//! User identity at the tracking boundary
//!
//! The platform's auth layer hands us a user id string, or nothing at all.
//! Historically "no user" was encoded as the literal string `"guest"`; this
//! module is the single place that sentinel is interpreted. Everything past
//! the boundary works with [`Identity`], so "anonymous users are never
//! tracked" is enforced by the type rather than by string comparison.

use std::sync::Arc;

/// Legacy placeholder id the auth layer uses for signed-out sessions
pub const GUEST_SENTINEL: &str = "guest";

/// Resolved identity of the acting user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Signed-in user with a stable id
    Authenticated(String),
    /// Signed-out or unresolved session; progress is never tracked
    Anonymous,
}

impl Identity {
    /// Interpret a raw user id from the auth layer.
    ///
    /// A missing id, an empty id, and the legacy guest sentinel all resolve
    /// to [`Identity::Anonymous`].
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        match user_id {
            Some(id) if !id.is_empty() && id != GUEST_SENTINEL => {
                Identity::Authenticated(id.to_string())
            }
            _ => Identity::Anonymous,
        }
    }

    /// Get the user id, if authenticated
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::Authenticated(id) => Some(id),
            Identity::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

/// Source of the current user identity.
///
/// The platform wires its session/auth layer in here; failures resolving a
/// session are mapped to [`Identity::Anonymous`] by the adapter, never
/// surfaced as errors.
pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Identity;
}

/// Provider pinned to a single identity (CLI, tests)
pub struct FixedIdentityProvider {
    identity: Identity,
}

impl FixedIdentityProvider {
    pub fn authenticated(user_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            identity: Identity::Authenticated(user_id.into()),
        })
    }

    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self {
            identity: Identity::Anonymous,
        })
    }

    /// Build from a raw optional user id, applying the sentinel mapping
    pub fn from_user_id(user_id: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            identity: Identity::from_user_id(user_id),
        })
    }
}

impl IdentityProvider for FixedIdentityProvider {
    fn current_identity(&self) -> Identity {
        self.identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_sentinel_resolves_anonymous() {
        assert_eq!(Identity::from_user_id(Some("guest")), Identity::Anonymous);
        assert_eq!(Identity::from_user_id(Some("")), Identity::Anonymous);
        assert_eq!(Identity::from_user_id(None), Identity::Anonymous);
    }

    #[test]
    fn test_real_id_resolves_authenticated() {
        let identity = Identity::from_user_id(Some("u1"));
        assert_eq!(identity, Identity::Authenticated("u1".to_string()));
        assert_eq!(identity.user_id(), Some("u1"));
        assert!(!identity.is_anonymous());
    }

    #[test]
    fn test_fixed_provider() {
        let provider = FixedIdentityProvider::from_user_id(Some("guest"));
        assert!(provider.current_identity().is_anonymous());

        let provider = FixedIdentityProvider::authenticated("u1");
        assert_eq!(provider.current_identity().user_id(), Some("u1"));
    }
}
