//! Application configuration.
//!
//! Loads `config.toml` from the app config directory. A missing file is not
//! an error: defaults apply, so a fresh install works with zero setup. The
//! `MELONMART_API_URL` environment variable overrides the configured API
//! origin either way.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use melonmart_core::Result;

use crate::paths::MartPaths;

/// Environment variable overriding the configured API base URL.
pub const API_URL_ENV: &str = "MELONMART_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

/// Client-side application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base origin of the remote storefront API.
    pub api_base_url: String,
    /// API key for the optional image-analysis service. Absent disables the
    /// analyzer; the seller form then submits ungraded.
    pub analysis_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            analysis_api_key: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default location, applying the
    /// environment override.
    pub fn load() -> Result<Self> {
        let mut config = match MartPaths::config_file() {
            Ok(path) => Self::load_from(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_override();
        Ok(config)
    }

    /// Loads configuration from an explicit path; a missing file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Fails only when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env_override(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
    }
}
