//! src/error.rs
//! ============================================================================
//! # AppError: Unified Error Type
//!
//! This module defines the error enum (`AppError`) shared across the scan,
//! cache, and navigation layers. Each variant carries enough context for
//! diagnostics; modules that surface errors at all use `Result<T, AppError>`.
//!
//! Note that most failure paths in this crate are deliberately *recovered
//! locally* (missing root directory, unreadable subdirectories, corrupt or
//! unwritable cache files) and never become an `AppError` at the API surface.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for scan, cache, and configuration operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Caching layer error.
    #[error("Cache error: {0}")]
    Cache(String),

    /// TOML settings parsing error.
    #[error("Settings parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Settings file I/O error with path.
    #[error("Failed to read settings file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization error (cache records are JSON).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Async task failure or join error.
    #[error("Async task failed: {0}")]
    Task(String),

    /// Operation cancelled by the session owner.
    #[error("Operation was cancelled")]
    Cancelled,

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Attach extra context to an error.
    pub fn with_context<S: Into<String>>(self, ctx: S) -> AppError {
        AppError::Other(format!("{}: {}", ctx.into(), self))
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Other(e.to_string())
    }
}
