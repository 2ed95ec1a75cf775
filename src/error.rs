//! Error types for the sitesearch library.
//!
//! All fallible operations return [`SitesearchError`]. Query parsing and
//! highlighting never fail, so in practice a search caller only sees
//! configuration errors, raised when a [`SearchConfig`](crate::search::config::SearchConfig)
//! is built or an index is constructed from it.
//!
//! # Examples
//!
//! ```
//! use sitesearch::error::{Result, SitesearchError};
//!
//! fn check_weight(weight: f32) -> Result<()> {
//!     if weight <= 0.0 {
//!         return Err(SitesearchError::configuration("weight must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_weight(0.0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for sitesearch operations.
#[derive(Error, Debug)]
pub enum SitesearchError {
    /// Invalid search configuration (bad weights, duplicate fields, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// History store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// An error with context attached, shown with its whole cause chain
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SitesearchError.
pub type Result<T> = std::result::Result<T, SitesearchError>;

impl SitesearchError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        SitesearchError::Configuration(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SitesearchError::Storage(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SitesearchError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SitesearchError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error is a configuration error the caller must fix.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SitesearchError::Configuration(_))
    }
}
