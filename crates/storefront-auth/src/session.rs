//! Session management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_commerce::ids::UserId;
use storefront_data::AccessToken;
use tokio::sync::watch;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identity provider user id.
    pub user_id: UserId,
    /// Email the shopper signed in with.
    pub email: String,
    /// Bearer token for the cart API.
    pub access_token: AccessToken,
}

impl Session {
    /// Create a new session.
    pub fn new(user_id: UserId, email: impl Into<String>, access_token: AccessToken) -> Self {
        Self {
            user_id,
            email: email.into(),
            access_token,
        }
    }
}

/// Read access to the current session.
pub trait SessionAccessor: Send + Sync {
    /// The current session, if signed in.
    fn current(&self) -> Option<Session>;

    /// Bearer token of the current session.
    fn access_token(&self) -> Option<AccessToken> {
        self.current().map(|s| s.access_token)
    }
}

/// Holds the current session and publishes every change.
///
/// Clones share the same session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sender: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    /// Create a signed-out store.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create a store that starts signed in.
    pub fn with_session(session: Session) -> Self {
        let (sender, _) = watch::channel(Some(session));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the session. Subscribers are notified only on change.
    pub fn set(&self, session: Option<Session>) {
        self.sender.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    /// Sign out locally.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Receive session transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAccessor for SessionStore {
    fn current(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }
}
