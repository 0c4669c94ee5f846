//! Credential storage abstraction.
//!
//! The [`CredentialStore`] trait persists the bearer token and the user it
//! belongs to between runs. Backends: [`FileCredentialStore`](super::FileCredentialStore)
//! and [`MemoryCredentialStore`].

use super::StorageError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use stockroom_types::User;

/// What survives between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
    pub user: User,
}

/// Credential persistence.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across async tasks.
///
/// # Example
///
/// ```no_run
/// use stockroom_client::session::{CredentialStore, StorageError};
///
/// async fn signed_in(store: &impl CredentialStore) -> Result<bool, StorageError> {
///     Ok(store.load().await?.is_some())
/// }
/// ```
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credentials, or `None` if there are none.
    fn load(&self) -> impl Future<Output = Result<Option<StoredCredentials>, StorageError>> + Send;

    /// Replaces the stored credentials.
    fn save(
        &self,
        credentials: &StoredCredentials,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes the stored credentials. Removing nothing is not an error.
    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// In-memory store for tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredCredentials>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `credentials`.
    #[must_use]
    pub fn with(credentials: StoredCredentials) -> Self {
        Self {
            inner: Mutex::new(Some(credentials)),
        }
    }

    /// Current contents, without going through the async API.
    #[must_use]
    pub fn snapshot(&self) -> Option<StoredCredentials> {
        self.inner.lock().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredentials>, StorageError> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        *self.inner.lock() = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.inner.lock() = None;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::credentials;
    use super::*;
    use stockroom_types::Role;

    #[tokio::test]
    async fn memory_store_round() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&credentials(Role::Manager)).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.user.role(), Role::Manager);

        store.clear().await.unwrap();
        assert!(store.snapshot().is_none());
        // Clearing twice is fine.
        store.clear().await.unwrap();
    }

    #[test]
    fn credentials_json_shape() {
        let json = serde_json::to_value(credentials(Role::Viewer)).unwrap();
        assert_eq!(json["token"], "tok-123");
        assert_eq!(json["user"]["role"]["name"], "Viewer");
        assert_eq!(json["user"]["isActive"], true);
    }
}
