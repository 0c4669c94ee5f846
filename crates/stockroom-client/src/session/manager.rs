//! Session lifecycle: bootstrap, login, logout.
//!
//! # Bootstrap
//!
//! ```text
//! bootstrap()
//!   ├─ another bootstrap running ─────────► AlreadyInFlight
//!   ├─ capture generation g
//!   ├─ no stored credentials ─────────────► Resolved(None)
//!   ├─ GET /auth/profile with stored token
//!   │     ok   → pending: refresh stored user, Resolved(Some(principal))
//!   │     fail → pending: clear store,          Resolved(None)
//!   └─ lock store, generation still g?
//!         yes → write store, apply
//!         no  → Stale (nothing written)
//! ```
//!
//! Store writes from login, logout, invalidation and bootstrap are
//! serialized by one lock, and login/logout change the generation inside
//! or before it. A bootstrap that finds the generation moved therefore
//! never touches credentials that a newer login or logout owns.

use super::{CredentialStore, SessionState, StoredCredentials};
use crate::{ApiClient, ClientError};
use reqwest::Method;
use std::sync::Arc;
use stockroom_auth::{AuthStatus, Principal, RoleSource};
use stockroom_types::{ApiResponse, LoginData, LoginRequest, User};
use tokio::sync::Mutex;

/// Result of [`SessionManager::bootstrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The session resolved to this status.
    Resolved(AuthStatus),
    /// Another bootstrap was already running; nothing was done.
    AlreadyInFlight,
    /// A login or logout happened meanwhile; the result was discarded.
    Stale,
}

/// Owns the current principal and its persisted credentials.
///
/// Implements [`RoleSource`], so authorization checks read straight from
/// the manager.
pub struct SessionManager<S> {
    client: ApiClient,
    store: S,
    state: Arc<SessionState>,
    bootstrap_lock: Mutex<()>,
    store_lock: Mutex<()>,
}

/// Store change a validation wants, applied only if still current.
#[derive(Debug)]
enum PendingWrite {
    Keep,
    Save(StoredCredentials),
    Clear,
}

impl<S: CredentialStore> SessionManager<S> {
    /// Creates a manager sharing `client`'s session state.
    pub fn new(client: ApiClient, store: S) -> Self {
        let state = Arc::clone(client.state());
        Self {
            client,
            store,
            state,
            bootstrap_lock: Mutex::new(()),
            store_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.state.status()
    }

    /// Bearer token of the signed-in principal.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.token()
    }

    /// Resolves the session from stored credentials.
    ///
    /// At most one bootstrap runs at a time. The result is applied only if
    /// no login, logout or invalidation happened while it ran.
    ///
    /// # Errors
    ///
    /// [`ClientError::Storage`] if the credential store cannot be read.
    /// A rejected or unreachable profile check is not an error: it
    /// resolves the session as signed out.
    pub async fn bootstrap(&self) -> Result<BootstrapOutcome, ClientError> {
        let Ok(_guard) = self.bootstrap_lock.try_lock() else {
            tracing::debug!("bootstrap already in flight");
            return Ok(BootstrapOutcome::AlreadyInFlight);
        };

        let generation = self.state.generation();

        let (status, token, write) = match self.store.load().await? {
            None => {
                tracing::debug!("no stored credentials");
                (AuthStatus::signed_out(), None, PendingWrite::Keep)
            }
            Some(stored) => self.validate(stored).await,
        };

        let _store = self.store_lock.lock().await;
        if !self.state.is_current(generation) {
            tracing::debug!(generation, "bootstrap result discarded as stale");
            return Ok(BootstrapOutcome::Stale);
        }
        match write {
            PendingWrite::Keep => {}
            PendingWrite::Save(credentials) => self.store.save(&credentials).await?,
            PendingWrite::Clear => self.store.clear().await?,
        }

        if self
            .state
            .resolve_if_current(generation, status.clone(), token)
        {
            tracing::debug!(authenticated = status.is_authenticated(), "session resolved");
            Ok(BootstrapOutcome::Resolved(status))
        } else {
            tracing::debug!(generation, "bootstrap result discarded as stale");
            Ok(BootstrapOutcome::Stale)
        }
    }

    /// Checks the stored token against the server without writing anything.
    async fn validate(
        &self,
        stored: StoredCredentials,
    ) -> (AuthStatus, Option<String>, PendingWrite) {
        let profile: Result<ApiResponse<User>, _> = self
            .client
            .send_with_token(Method::GET, "/auth/profile", &stored.token)
            .await;

        match profile {
            Ok(resp) => {
                let user = resp.data;
                let status = AuthStatus::signed_in(Principal::from(&user));
                let write = if user == stored.user {
                    PendingWrite::Keep
                } else {
                    PendingWrite::Save(StoredCredentials {
                        token: stored.token.clone(),
                        user,
                    })
                };
                (status, Some(stored.token), write)
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored session rejected, clearing credentials");
                (AuthStatus::signed_out(), None, PendingWrite::Clear)
            }
        }
    }

    /// Signs in and persists the credentials.
    ///
    /// # Errors
    ///
    /// The server's rejection ([`ClientError::Api`]) or any transport or
    /// storage failure. The current session is left unchanged on error.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: ApiResponse<LoginData> =
            self.client.post_anonymous("/auth/login", &request).await?;
        let LoginData { user, token, .. } = resp.data;

        let _store = self.store_lock.lock().await;
        self.store
            .save(&StoredCredentials {
                token: token.clone(),
                user: user.clone(),
            })
            .await?;
        self.state.sign_in(Principal::from(&user), token);

        tracing::info!(principal = %user.username, role = %user.role(), "signed in");
        Ok(user)
    }

    /// Signs out: stales any bootstrap, tells the server (best effort),
    /// clears the store.
    ///
    /// # Errors
    ///
    /// [`ClientError::Storage`] if the stored credentials cannot be
    /// removed. The in-memory session is signed out regardless.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let token = self.state.token();
        self.state.sign_out();

        if let Some(token) = token {
            let result: Result<serde_json::Value, _> = self
                .client
                .send_with_token(Method::POST, "/auth/logout", &token)
                .await;
            if let Err(e) = result {
                tracing::warn!(error = %e, "server logout failed, continuing");
            }
        }

        let _store = self.store_lock.lock().await;
        self.store.clear().await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Local sign-out after the server rejected the session.
    ///
    /// # Errors
    ///
    /// [`ClientError::Storage`] if the stored credentials cannot be removed.
    pub async fn invalidate(&self) -> Result<(), ClientError> {
        self.state.invalidate();
        let _store = self.store_lock.lock().await;
        self.store.clear().await?;
        Ok(())
    }

    /// Replaces the signed-in user (after a profile edit).
    ///
    /// # Errors
    ///
    /// [`ClientError::Storage`] if the store cannot be written.
    pub async fn update_user(&self, user: User) -> Result<(), ClientError> {
        let Some(token) = self.state.token() else {
            return Ok(());
        };
        let _store = self.store_lock.lock().await;
        if self.state.token().as_deref() != Some(token.as_str()) {
            return Ok(());
        }
        self.state.refresh_principal(Principal::from(&user));
        self.store.save(&StoredCredentials { token, user }).await?;
        Ok(())
    }

    /// Re-fetches `/auth/profile` for the signed-in user.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`]; a 401 also signs the session out.
    pub async fn refresh_profile(&self) -> Result<User, ClientError> {
        let resp: ApiResponse<User> = self.client.get("/auth/profile").await?;
        self.update_user(resp.data.clone()).await?;
        Ok(resp.data)
    }
}

impl<S: CredentialStore> RoleSource for SessionManager<S> {
    fn auth_status(&self) -> AuthStatus {
        self.state.status()
    }
}

impl<S> std::fmt::Debug for SessionManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.client.base_url())
            .field("status", &self.state.status())
            .field("generation", &self.state.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::session::store::fixtures::credentials;
    use crate::session::MemoryCredentialStore;
    use stockroom_types::Role;

    /// Points at a closed port so every request fails fast.
    fn offline_manager(store: MemoryCredentialStore) -> SessionManager<MemoryCredentialStore> {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
        };
        let client = ApiClient::new(&config, Arc::new(SessionState::new())).unwrap();
        SessionManager::new(client, store)
    }

    #[tokio::test]
    async fn bootstrap_without_credentials_signs_out() {
        let manager = offline_manager(MemoryCredentialStore::new());
        assert_eq!(manager.status(), AuthStatus::Unresolved);

        let outcome = manager.bootstrap().await.unwrap();
        assert_eq!(outcome, BootstrapOutcome::Resolved(AuthStatus::signed_out()));
        assert_eq!(manager.status(), AuthStatus::signed_out());
    }

    #[tokio::test]
    async fn unreachable_server_clears_credentials() {
        let manager = offline_manager(MemoryCredentialStore::with(credentials(Role::Admin)));

        let outcome = manager.bootstrap().await.unwrap();
        assert_eq!(outcome, BootstrapOutcome::Resolved(AuthStatus::signed_out()));
        assert!(manager.store().snapshot().is_none());
    }

    #[tokio::test]
    async fn stale_bootstrap_leaves_store_alone() {
        let manager = offline_manager(MemoryCredentialStore::with(credentials(Role::Admin)));

        // The sign-in lands while the profile check is still connecting.
        let (outcome, ()) = tokio::join!(manager.bootstrap(), async {
            manager
                .state
                .sign_in(Principal::new(2, "bob", Role::Viewer), "tok-bob".into());
        });

        assert_eq!(outcome.unwrap(), BootstrapOutcome::Stale);
        assert_eq!(manager.current_role(), Some(Role::Viewer));
        assert_eq!(manager.store().snapshot().unwrap().token, "tok-123");
    }

    #[tokio::test]
    async fn concurrent_bootstrap_is_single_flight() {
        let manager = offline_manager(MemoryCredentialStore::new());
        let _held = manager.bootstrap_lock.lock().await;

        assert_eq!(
            manager.bootstrap().await.unwrap(),
            BootstrapOutcome::AlreadyInFlight
        );
        assert_eq!(manager.status(), AuthStatus::Unresolved);
    }

    #[tokio::test]
    async fn logout_offline_still_signs_out() {
        let manager = offline_manager(MemoryCredentialStore::with(credentials(Role::Viewer)));
        manager
            .state
            .sign_in(Principal::new(1, "alice", Role::Viewer), "tok-123".into());

        manager.logout().await.unwrap();

        assert_eq!(manager.status(), AuthStatus::signed_out());
        assert!(manager.token().is_none());
        assert!(manager.store().snapshot().is_none());
    }

    #[tokio::test]
    async fn invalidate_clears_store() {
        let manager = offline_manager(MemoryCredentialStore::with(credentials(Role::Viewer)));
        manager
            .state
            .sign_in(Principal::new(1, "alice", Role::Viewer), "tok-123".into());

        manager.invalidate().await.unwrap();
        assert_eq!(manager.current_role(), None);
        assert!(manager.store().snapshot().is_none());
    }

    #[tokio::test]
    async fn update_user_refreshes_principal_and_store() {
        let manager = offline_manager(MemoryCredentialStore::new());
        manager
            .state
            .sign_in(Principal::new(1, "alice", Role::Viewer), "tok-123".into());

        let promoted = credentials(Role::Manager).user;
        manager.update_user(promoted).await.unwrap();

        assert_eq!(manager.current_role(), Some(Role::Manager));
        let stored = manager.store().snapshot().unwrap();
        assert_eq!(stored.token, "tok-123");
        assert_eq!(stored.user.role(), Role::Manager);
    }

    #[tokio::test]
    async fn update_user_when_signed_out_is_noop() {
        let manager = offline_manager(MemoryCredentialStore::new());
        manager.update_user(credentials(Role::Admin).user).await.unwrap();
        assert!(manager.store().snapshot().is_none());
        assert_eq!(manager.status(), AuthStatus::Unresolved);
    }
}
