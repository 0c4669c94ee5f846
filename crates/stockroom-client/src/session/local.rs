//! File-based credential storage.
//!
//! ```text
//! ~/.stockroom/
//! ├── config.toml
//! └── credentials.json     { "token": "...", "user": { ... } }
//! ```

use super::{CredentialStore, StorageError, StoredCredentials};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Credentials kept as one JSON file.
///
/// # Features
///
/// - Atomic writes (write to temp, then rename)
/// - Parent directory created on first save
/// - `~/` expanded to the home directory
/// - File created with mode `0600` on Unix
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_tilde(path.as_ref()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("credentials.json");
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredentials>, StorageError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).await?;
        let credentials = serde_json::from_str(&json)?;
        Ok(Some(credentials))
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !fs::try_exists(parent).await? {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::directory_creation(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(credentials)?;
        let temp = self.temp_path();

        match fs::remove_file(&temp).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        write_private(&temp, json.as_bytes()).await?;
        fs::rename(&temp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed credentials");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Creates `path` (which must not exist) readable by the owner only.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

/// Expands `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
