//! Bot client capability.
//!
//! The dispatcher only needs to send a text message to a chat. Backends
//! implement [`BotClient`]; tests use an in-memory fake.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a bot client can report for a single send.
#[derive(Debug, Clone, Error)]
pub enum BotError {
    /// The messaging API rejected the request.
    #[error("API error: {0}")]
    Api(String),

    /// The request could not be delivered.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete in time.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Credentials for the bot account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotCredentials {
    /// Bot user name, e.g. `ci_status_bot`.
    pub user_name: String,
    /// Bot API token.
    pub token: String,
}

impl BotCredentials {
    pub fn new(user_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            token: token.into(),
        }
    }

    /// Both fields are present.
    pub fn is_complete(&self) -> bool {
        !self.user_name.is_empty() && !self.token.is_empty()
    }
}

/// Capability to send a message to a chat.
///
/// Implementations must be `Send + Sync` so sends can be fanned out
/// concurrently.
#[async_trait]
pub trait BotClient: Send + Sync {
    /// Send `text` to the chat identified by `chat_id`.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError>;

    /// Client name for logging.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: BotClient + ?Sized> BotClient for std::sync::Arc<T> {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        (**self).send_message(chat_id, text).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
