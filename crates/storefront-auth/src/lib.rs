//! Authentication for the storefront client.
//!
//! Token issuance is delegated to an external identity provider behind the
//! [`IdentityProvider`] trait. This crate keeps the current session and
//! publishes every transition to subscribers.

mod error;
mod provider;
mod service;
mod session;

pub use error::AuthError;
pub use provider::{IdentityProvider, SignUp};
pub use service::AuthService;
pub use session::{Session, SessionAccessor, SessionStore};
