//! Sign-in, sign-up and sign-out.

use std::sync::Arc;

use storefront_data::UserApi;

use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::session::{Session, SessionAccessor, SessionStore};

/// Drives the identity provider and publishes the resulting sessions.
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserApi>,
    store: SessionStore,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserApi>,
        store: SessionStore,
    ) -> Self {
        Self {
            provider,
            users,
            store,
        }
    }

    /// The session store this service publishes to.
    pub fn sessions(&self) -> &SessionStore {
        &self.store
    }

    /// Sign in and publish the new session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.provider.sign_in(email.trim(), password).await?;
        tracing::info!(user_id = %session.user_id, "Signed in");
        self.store.set(Some(session.clone()));
        Ok(session)
    }

    /// Create an identity, then register it with the backend.
    ///
    /// The shopper is signed in only if the provider returned a session.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::SignUpFailed("email and password are required".into()));
        }

        let sign_up = self.provider.sign_up(email, password).await?;
        self.users
            .create_user(&sign_up.user_id, email)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %sign_up.user_id,
                    error = %e,
                    "Account registration failed"
                );
                AuthError::Registration(e)
            })?;

        tracing::info!(user_id = %sign_up.user_id, "Signed up");
        if let Some(session) = &sign_up.session {
            self.store.set(Some(session.clone()));
        }
        Ok(sign_up.session)
    }

    /// Sign out. The session is kept if the provider refuses.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.store.current() else {
            return Ok(());
        };

        self.provider.sign_out(&session).await?;
        tracing::info!(user_id = %session.user_id, "Signed out");
        self.store.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use storefront_commerce::ids::UserId;
    use storefront_data::{AccessToken, FetchError};

    use crate::provider::SignUp;

    #[derive(Default)]
    struct FakeProvider {
        fail_sign_out: bool,
        confirm_email: bool,
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
            if password != "hunter2" {
                return Err(AuthError::InvalidCredentials);
            }
            Ok(Session::new(UserId::new("u-1"), email, AccessToken::new("tok")))
        }

        async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUp, AuthError> {
            let session = (!self.confirm_email)
                .then(|| Session::new(UserId::new("u-2"), email, AccessToken::new("tok-2")));
            Ok(SignUp {
                user_id: UserId::new("u-2"),
                session,
            })
        }

        async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
            if self.fail_sign_out {
                Err(AuthError::SignOutFailed("network".into()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct FakeUsers {
        created: Mutex<Vec<(UserId, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl UserApi for FakeUsers {
        async fn create_user(&self, id: &UserId, email: &str) -> Result<(), FetchError> {
            if self.fail {
                return Err(FetchError::Http {
                    status: 500,
                    url: "/api/v1/users".into(),
                });
            }
            self.created.lock().unwrap().push((id.clone(), email.to_string()));
            Ok(())
        }
    }

    fn service(provider: FakeProvider, users: Arc<FakeUsers>) -> AuthService {
        AuthService::new(Arc::new(provider), users, SessionStore::new())
    }

    #[tokio::test]
    async fn test_sign_in_publishes_session() {
        let auth = service(FakeProvider::default(), Arc::new(FakeUsers::default()));
        let rx = auth.sessions().subscribe();

        let session = auth.sign_in(" a@example.com ", "hunter2").await.unwrap();
        assert_eq!(session.email, "a@example.com");
        assert!(rx.has_changed().unwrap());
        assert_eq!(auth.sessions().current(), Some(session));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_credentials() {
        let auth = service(FakeProvider::default(), Arc::new(FakeUsers::default()));

        let err = auth.sign_in("a@example.com", "wrong").await.unwrap_err();
        assert!(err.is_auth_failure());
        assert!(auth.sessions().current().is_none());

        assert!(matches!(
            auth.sign_in("", "hunter2").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_registers_backend_account() {
        let users = Arc::new(FakeUsers::default());
        let auth = service(FakeProvider::default(), users.clone());

        let session = auth.sign_up("b@example.com", "pw").await.unwrap();
        assert!(session.is_some());
        assert_eq!(
            *users.created.lock().unwrap(),
            vec![(UserId::new("u-2"), "b@example.com".to_string())]
        );
        assert!(auth.sessions().current().is_some());
    }

    #[tokio::test]
    async fn test_sign_up_awaiting_confirmation_stays_signed_out() {
        let provider = FakeProvider {
            confirm_email: true,
            ..FakeProvider::default()
        };
        let auth = service(provider, Arc::new(FakeUsers::default()));

        assert_eq!(auth.sign_up("b@example.com", "pw").await.unwrap(), None);
        assert!(auth.sessions().current().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_registration_failure() {
        let users = Arc::new(FakeUsers {
            fail: true,
            ..FakeUsers::default()
        });
        let auth = service(FakeProvider::default(), users);

        let err = auth.sign_up("b@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Registration(FetchError::Http { status: 500, .. })));
        assert!(auth.sessions().current().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_keeps_session_on_failure() {
        let provider = FakeProvider {
            fail_sign_out: true,
            ..FakeProvider::default()
        };
        let auth = service(provider, Arc::new(FakeUsers::default()));
        auth.sign_in("a@example.com", "hunter2").await.unwrap();

        assert!(auth.sign_out().await.is_err());
        assert!(auth.sessions().current().is_some());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let auth = service(FakeProvider::default(), Arc::new(FakeUsers::default()));
        auth.sign_in("a@example.com", "hunter2").await.unwrap();

        auth.sign_out().await.unwrap();
        assert!(auth.sessions().current().is_none());
        // signing out twice is a no-op
        auth.sign_out().await.unwrap();
    }
}
