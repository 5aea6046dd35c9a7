//! Error types for the Seawatch situational map.
//!
//! Feed failures are transient by design: a failed poll leaves the previously
//! rendered state in place and the next scheduled tick is the retry. Only
//! configuration errors are fatal, and only at startup.

use thiserror::Error;

/// Result type alias using [`SeawatchError`] as the error type.
pub type Result<T> = std::result::Result<T, SeawatchError>;

/// Top-level error type for all Seawatch operations.
#[derive(Debug, Error)]
pub enum SeawatchError {
    /// Feed polling errors
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal errors that shouldn't normally occur
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while pulling one snapshot from a data source.
///
/// Every variant is transient from the engine's point of view: the owning
/// reconciler or widget logs it and keeps its previous state.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure reaching the backend
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Backend answered with a non-success status
    #[error("Backend returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// Response body could not be decoded
    #[error("Failed to decode {what} response: {reason}")]
    Decode { what: String, reason: String },
}

impl FeedError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates a decode error.
    pub fn decode(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Configuration could not be parsed
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Creates a load failed error.
    pub fn load_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
