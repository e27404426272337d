//! Unified path management for MelonMart client files.
//!
//! All durable client-side state (the bearer token and the application
//! config) lives under one per-user config directory, resolved the same way
//! on every platform.

use std::path::PathBuf;

use melonmart_core::{MartError, Result};

/// Unified path management for MelonMart.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/melonmart/         # Linux (platform-appropriate elsewhere)
/// ├── config.toml              # Application configuration
/// └── auth.toml                # Persisted bearer token
/// ```
pub struct MartPaths;

impl MartPaths {
    /// Returns the MelonMart configuration directory.
    ///
    /// # Errors
    ///
    /// Fails if the platform config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("melonmart"))
            .ok_or_else(|| MartError::config("cannot find config directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted-token file.
    pub fn token_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("auth.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let dir = MartPaths::config_dir().unwrap();
        assert!(MartPaths::config_file().unwrap().starts_with(&dir));
        assert!(MartPaths::token_file().unwrap().starts_with(&dir));
        assert!(dir.ends_with("melonmart"));
    }
}
