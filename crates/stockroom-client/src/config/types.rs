//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// API base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api/v1";

/// Per-request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure, after merging all layers.
///
/// # Example
///
/// ```
/// use stockroom_client::config::StockroomConfig;
///
/// let config = StockroomConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.api.base_url, "http://localhost:3001/api/v1");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StockroomConfig {
    /// Verbose logging.
    pub debug: bool,

    /// REST API settings.
    pub api: ApiConfig,

    /// File locations.
    pub paths: PathsConfig,
}

impl StockroomConfig {
    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they differ
    /// from the default.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.api.merge(&other.api);
        self.paths.merge(&other.paths);
    }
}

/// REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the version prefix, without trailing slash.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.base_url != default.base_url {
            self.base_url = other.base_url.clone();
        }
        if other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// File locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Where the session token and user are kept.
    pub credentials_file: Option<PathBuf>,
}

impl PathsConfig {
    fn merge(&mut self, other: &Self) {
        if other.credentials_file.is_some() {
            self.credentials_file = other.credentials_file.clone();
        }
    }

    /// Returns the credentials file, falling back to
    /// `~/.stockroom/credentials.json`.
    #[must_use]
    pub fn credentials_file_or_default(&self) -> PathBuf {
        self.credentials_file
            .clone()
            .unwrap_or_else(super::default_credentials_path)
    }
}
