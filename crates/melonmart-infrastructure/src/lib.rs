//! MelonMart infrastructure.
//!
//! Durable client-side state: the file-backed bearer-token store (the one
//! piece of state that survives restarts), the TOML application config, and
//! platform path resolution.

pub mod config;
pub mod paths;
pub mod token_store;

pub use config::{AppConfig, API_URL_ENV};
pub use paths::MartPaths;
pub use token_store::FileTokenStore;
