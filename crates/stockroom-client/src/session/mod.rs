//! Session state, credential persistence and lifecycle.
//!
//! # Architecture
//!
//! ```text
//! SessionManager<S: CredentialStore>
//!   │  bootstrap / login / logout / invalidate
//!   ├── S (FileCredentialStore | MemoryCredentialStore)   persisted token + user
//!   └── Arc<SessionState>                                  in-memory status + token
//!             ▲
//!             └── ApiClient reads the token, invalidates on 401
//! ```
//!
//! A 401 seen by the client signs the in-memory session out immediately.
//! The stored credentials are cleared by [`SessionManager::invalidate`] or
//! by the next bootstrap, whose profile check fails.

mod error;
mod local;
mod manager;
mod state;
pub(crate) mod store;

pub use error::StorageError;
pub use local::FileCredentialStore;
pub use manager::{BootstrapOutcome, SessionManager};
pub use state::SessionState;
pub use store::{CredentialStore, MemoryCredentialStore, StoredCredentials};
