//! Error types for the Telegram notifier.

use notifier_core::{DispatchError, NotifierError};
use thiserror::Error;

/// Errors that can occur in the Telegram notifier.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot API base URL could not be parsed.
    #[error("Invalid Bot API URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    /// `getMe` failed, usually a bad token.
    #[error("Failed to reach bot: {0}")]
    GetMeFailed(String),

    /// A settings field failed validation.
    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// Settings or configuration error.
    #[error(transparent)]
    Notifier(#[from] NotifierError),

    /// The notification step failed.
    #[error("Notification failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;
