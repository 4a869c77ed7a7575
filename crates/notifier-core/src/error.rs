//! Error types for the notifier core.

use thiserror::Error;

/// Errors that can occur outside of a dispatch fan-out.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// A build result label could not be recognised.
    #[error("Invalid build result: {0}")]
    InvalidBuildResult(String),

    /// Bot user name or token missing from the settings.
    #[error("Notifier is not configured: {0}")]
    NotConfigured(String),

    /// Settings file could not be parsed or written.
    #[error("Settings error: {0}")]
    SettingsError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifierError>;
