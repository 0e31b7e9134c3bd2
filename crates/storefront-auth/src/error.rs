//! Authentication errors.

use storefront_data::FetchError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The identity provider refused the sign-up.
    #[error("sign up failed: {0}")]
    SignUpFailed(String),

    /// The identity provider refused the sign-out.
    #[error("sign out failed: {0}")]
    SignOutFailed(String),

    /// The identity was created but the backend account was not.
    #[error("account registration failed: {0}")]
    Registration(#[from] FetchError),

    /// Any other identity provider failure.
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials)
    }
}
