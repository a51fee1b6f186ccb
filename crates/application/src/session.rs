//! Backend session mirror
//!
//! Keeps a local copy of who is signed in. The backend owns the session;
//! this only asks it.

use std::sync::Arc;

use docforge_domain::AuthSession;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::ports::SessionApi;

/// Tracks the backend session for the current user.
pub struct SessionManager<A: SessionApi> {
    api: Arc<A>,
    session: RwLock<AuthSession>,
    temp_token: Mutex<Option<String>>,
}

impl<A: SessionApi> SessionManager<A> {
    /// Creates a manager whose session is not checked yet.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            session: RwLock::new(AuthSession::Unknown),
            temp_token: Mutex::new(None),
        }
    }

    /// The session as last checked.
    pub fn current(&self) -> AuthSession {
        self.session.read().clone()
    }

    /// URL to send the browser to for signing in.
    pub fn login_url(&self) -> String {
        self.api.login_url()
    }

    /// Keeps the temporary token handed back by the login redirect.
    ///
    /// It is used once, by the next [`Self::refresh`].
    pub fn complete_login(&self, token: impl Into<String>) {
        *self.temp_token.lock() = Some(token.into());
    }

    /// Asks the backend who is signed in.
    ///
    /// The session cookie is tried first. If that fails and a temporary
    /// token is held, the check is repeated with it as a bearer token. The
    /// token is dropped either way. Failures leave the session
    /// [`AuthSession::Anonymous`].
    pub async fn refresh(&self) -> AuthSession {
        let token = self.temp_token.lock().take();

        let result = match self.api.current_user(None).await {
            Ok(user) => Ok(user),
            Err(error) => match token.as_deref() {
                Some(token) => {
                    debug!(%error, "cookie session check failed, retrying with token");
                    self.api.current_user(Some(token)).await
                }
                None => Err(error),
            },
        };

        let session = match result {
            Ok(user) => {
                info!(user_id = %user.id, "signed in");
                AuthSession::Authenticated(user)
            }
            Err(error) => {
                debug!(%error, "no active session");
                AuthSession::Anonymous
            }
        };
        *self.session.write() = session.clone();
        session
    }

    /// Ends the backend session. The local session is anonymous afterwards
    /// even if the backend call fails.
    pub async fn logout(&self) {
        if let Err(error) = self.api.logout().await {
            warn!(%error, "logout failed");
        }
        self.temp_token.lock().take();
        *self.session.write() = AuthSession::Anonymous;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docforge_domain::User;
    use pretty_assertions::assert_eq;

    use crate::ports::{BackendError, BackendResult};

    /// Mock session API that accepts the cookie and/or one bearer token.
    #[derive(Default)]
    struct MockSessionApi {
        cookie_valid: bool,
        valid_token: Option<String>,
        bearers: Mutex<Vec<Option<String>>>,
        logouts: Mutex<u32>,
        logout_fails: bool,
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            email: Some("ada@example.com".into()),
            name: Some("Ada".into()),
            picture: None,
        }
    }

    #[async_trait]
    impl SessionApi for MockSessionApi {
        async fn current_user(&self, bearer: Option<&str>) -> BackendResult<User> {
            self.bearers.lock().push(bearer.map(str::to_string));
            let accepted = match bearer {
                None => self.cookie_valid,
                Some(token) => self.valid_token.as_deref() == Some(token),
            };
            if accepted {
                Ok(user())
            } else {
                Err(BackendError::Status {
                    status: 401,
                    message: "Not authenticated".into(),
                })
            }
        }

        async fn logout(&self) -> BackendResult<()> {
            *self.logouts.lock() += 1;
            if self.logout_fails {
                Err(BackendError::Connection("Cannot connect to backend".into()))
            } else {
                Ok(())
            }
        }

        fn login_url(&self) -> String {
            "http://backend.test/api/v1/authentication/login".into()
        }
    }

    #[tokio::test]
    async fn test_cookie_session() {
        let api = Arc::new(MockSessionApi {
            cookie_valid: true,
            ..MockSessionApi::default()
        });
        let manager = SessionManager::new(Arc::clone(&api));
        assert_eq!(manager.current(), AuthSession::Unknown);

        let session = manager.refresh().await;

        assert_eq!(session, AuthSession::Authenticated(user()));
        assert_eq!(*api.bearers.lock(), vec![None]);
    }

    #[tokio::test]
    async fn test_falls_back_to_temporary_token_once() {
        let api = Arc::new(MockSessionApi {
            valid_token: Some("tmp-123".into()),
            ..MockSessionApi::default()
        });
        let manager = SessionManager::new(Arc::clone(&api));
        manager.complete_login("tmp-123");

        assert!(manager.refresh().await.is_authenticated());
        assert_eq!(
            *api.bearers.lock(),
            vec![None, Some("tmp-123".to_string())]
        );

        // the token is single use
        assert_eq!(manager.refresh().await, AuthSession::Anonymous);
        assert_eq!(api.bearers.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_token_is_anonymous() {
        let api = Arc::new(MockSessionApi::default());
        let manager = SessionManager::new(Arc::clone(&api));
        manager.complete_login("stale");

        assert_eq!(manager.refresh().await, AuthSession::Anonymous);
        assert_eq!(manager.current(), AuthSession::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_on_error() {
        let api = Arc::new(MockSessionApi {
            cookie_valid: true,
            logout_fails: true,
            ..MockSessionApi::default()
        });
        let manager = SessionManager::new(Arc::clone(&api));
        manager.refresh().await;

        manager.logout().await;

        assert_eq!(manager.current(), AuthSession::Anonymous);
        assert_eq!(*api.logouts.lock(), 1);
    }

    #[test]
    fn test_login_url_comes_from_backend() {
        let manager = SessionManager::new(Arc::new(MockSessionApi::default()));
        assert_eq!(
            manager.login_url(),
            "http://backend.test/api/v1/authentication/login"
        );
    }
}
