//! File-backed token store.
//!
//! Persists the single bearer token as a small TOML file under the app
//! config directory. This is the client's only durable state; it survives
//! restarts until an explicit logout or invalidation purges it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use melonmart_core::{MartError, Result, TokenStore};

use crate::paths::MartPaths;

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// [`TokenStore`] backed by `auth.toml` in a directory of the caller's
/// choosing (the platform config dir in production, a tempdir in tests).
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store rooted at `dir`; the token lives in `dir/auth.toml`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("auth.toml"),
        }
    }

    /// Creates a store at the platform default location.
    ///
    /// # Errors
    ///
    /// Fails if the platform config directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        Ok(Self {
            path: MartPaths::token_file()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(unix)]
    async fn restrict_permissions(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&self.path, perms).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn restrict_permissions(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let file: TokenFile = toml::from_str(&content)?;
        Ok(Some(file.token))
    }

    async fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(&TokenFile {
            token: token.to_string(),
        })?;
        tokio::fs::write(&self.path, content).await?;
        self.restrict_permissions().await?;
        debug!(path = %self.path.display(), "token persisted");
        Ok(())
    }

    async fn purge(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "token purged");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
