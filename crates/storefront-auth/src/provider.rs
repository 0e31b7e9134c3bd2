//! Identity provider seam.

use async_trait::async_trait;
use storefront_commerce::ids::UserId;

use crate::error::AuthError;
use crate::session::Session;

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUp {
    /// Id of the created identity.
    pub user_id: UserId,
    /// Present when the provider signs the shopper in right away; absent
    /// when it waits for email confirmation.
    pub session: Option<Session>,
}

/// External service that issues access tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Create an identity.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthError>;

    /// Revoke a session.
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}
