//! Layered configuration.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────────┐
//! │  1. CLI flags (ConfigResolver)               │  Per invocation
//! ├──────────────────────────────────────────────┤
//! │  2. Environment Variables (STOCKROOM_*)      │  Runtime override
//! ├──────────────────────────────────────────────┤
//! │  3. Project Config (.stockroom/config.toml)  │  Project-specific
//! ├──────────────────────────────────────────────┤
//! │  4. Global Config (~/.stockroom/config.toml) │  User defaults
//! ├──────────────────────────────────────────────┤
//! │  5. Default Values                           │  Fallback
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `STOCKROOM_DEBUG` | `debug` | bool |
//! | `STOCKROOM_API_URL` | `api.base_url` | String |
//! | `STOCKROOM_TIMEOUT_SECS` | `api.timeout_secs` | u64 |
//! | `STOCKROOM_CREDENTIALS` | `paths.credentials_file` | PathBuf |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.stockroom/config.toml
//! debug = false
//!
//! [api]
//! base_url = "https://stock.example.com/api/v1"
//! timeout_secs = 30
//!
//! [paths]
//! credentials_file = "~/.stockroom/credentials.json"
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{ApiConfig, PathsConfig, StockroomConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

use std::path::PathBuf;

/// Default global config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stockroom")
}

/// Default global config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Default credentials file path.
pub fn default_credentials_path() -> PathBuf {
    default_config_dir().join("credentials.json")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".stockroom";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
