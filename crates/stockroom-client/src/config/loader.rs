//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values
//! 2. Global config (`~/.stockroom/config.toml`)
//! 3. Project config (`.stockroom/config.toml`)
//! 4. Environment variables (`STOCKROOM_*`)
//!
//! Each layer overrides the previous. The result is validated once all
//! layers are applied.

use super::{
    default_config_path, ConfigError, StockroomConfig, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;

macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use stockroom_client::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root(".")
///     .load()?;
/// # Ok::<(), stockroom_client::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    global_config_path: Option<PathBuf>,
    project_root: Option<PathBuf>,
    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Project config is loaded from `<project_root>/.stockroom/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read
    /// or parsed, an environment variable is malformed, or the merged
    /// result is unusable. Missing config files are ignored.
    pub fn load(&self) -> Result<StockroomConfig, ConfigError> {
        let mut config = StockroomConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global);
            }
        }

        if !self.skip_project {
            if let Some(ref root) = self.project_root {
                let path = root.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILE);
                if let Some(project) = load_file(&path)? {
                    debug!(path = %path.display(), "Loaded project config");
                    config.merge(&project);
                }
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        validate(&mut config)?;
        Ok(config)
    }
}

fn load_file(path: &Path) -> Result<Option<StockroomConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config =
        StockroomConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(config))
}

fn apply_env_vars(config: &mut StockroomConfig) -> Result<(), ConfigError> {
    parse_env_bool!(config.debug, "STOCKROOM_DEBUG");

    if let Ok(val) = std::env::var("STOCKROOM_API_URL") {
        config.api.base_url = val;
    }

    if let Ok(val) = std::env::var("STOCKROOM_TIMEOUT_SECS") {
        config.api.timeout_secs = val.trim().parse().map_err(|_| {
            ConfigError::invalid_env_var("STOCKROOM_TIMEOUT_SECS", "expected whole seconds")
        })?;
    }

    if let Ok(val) = std::env::var("STOCKROOM_CREDENTIALS") {
        config.paths.credentials_file = Some(PathBuf::from(val));
    }

    Ok(())
}

/// Trims the base URL and rejects values the client cannot use.
fn validate(config: &mut StockroomConfig) -> Result<(), ConfigError> {
    let url = config.api.base_url.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ConfigError::invalid_value("api.base_url", "must not be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::invalid_value(
            "api.base_url",
            format!("'{url}' is not an http(s) URL"),
        ));
    }
    config.api.base_url = url.to_string();

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::invalid_value(
            "api.timeout_secs",
            "must be at least 1",
        ));
    }
    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off"
/// (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
