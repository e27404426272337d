//! Error types for the MelonMart application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire MelonMart application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum MartError {
    /// An operation that requires a logged-in user was attempted without one.
    #[error("Not logged in")]
    Unauthenticated,

    /// The remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The remote API could not be reached at all (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// Durable client-side storage failed (token slot, config file).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input was rejected before any network call or state mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A second checkout was attempted while one is still in flight.
    #[error("A checkout is already in progress")]
    CheckoutInFlight,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MartError {
    /// Creates an Api error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error.
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Network error.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a Validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error means the caller's credentials are no good.
    ///
    /// Returns true for:
    /// - `Unauthenticated`
    /// - any `Api` error (the profile endpoint only fails on a bad token,
    ///   and a malformed success body is treated the same way)
    /// - `Serialization` errors from a response body
    ///
    /// `Network` errors are deliberately excluded: an unreachable server
    /// says nothing about whether the stored token is still valid.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Api { .. } | Self::Serialization { .. }
        )
    }
}

impl From<std::io::Error> for MartError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for MartError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MartError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MartError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MartError>`.
pub type Result<T> = std::result::Result<T, MartError>;
