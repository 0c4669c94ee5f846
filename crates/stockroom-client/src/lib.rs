//! REST client for the stockroom back office.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  api::*Api          typed services, permission-gated     │
//! ├──────────────────────────────────────────────────────────┤
//! │  ApiClient          reqwest, bearer token, error mapping │
//! ├──────────────────────────────────────────────────────────┤
//! │  session            SessionState, SessionManager,        │
//! │                     CredentialStore                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  config             layered TOML + env configuration     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stockroom_client::config::ConfigLoader;
//! use stockroom_client::session::{FileCredentialStore, SessionManager, SessionState};
//! use stockroom_client::ApiClient;
//! use stockroom_types::InventoryQuery;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! let client = ApiClient::new(&config.api, Arc::new(SessionState::new()))?;
//! let store = FileCredentialStore::new(config.paths.credentials_file_or_default());
//! let session = SessionManager::new(client, store);
//!
//! session.bootstrap().await?;
//! let page = session.client().inventory().list(&InventoryQuery::default()).await?;
//! println!("{} items", page.pagination.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
mod error;
mod http;
pub mod session;

pub use error::ClientError;
pub use http::ApiClient;
