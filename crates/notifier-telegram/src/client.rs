//! Telegram implementation of the bot client capability.

use std::time::Duration;

use async_trait::async_trait;
use notifier_core::{BotClient, BotCredentials, BotError, GlobalSettings};
use teloxide::prelude::*;
use teloxide::RequestError;
use tracing::{debug, warn};

use crate::error::{Result, TelegramError};

/// Default per-request timeout.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends messages through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    /// The teloxide bot instance.
    bot: Bot,
    /// Configured bot user name, checked against `getMe`.
    user_name: String,
    /// Timeout for each request.
    timeout: Duration,
}

impl TelegramClient {
    /// Create a client for the given bot account.
    pub fn new(credentials: &BotCredentials) -> Self {
        Self {
            bot: Bot::new(&credentials.token),
            user_name: credentials.user_name.clone(),
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Create a client from global settings.
    ///
    /// Fails if the bot user name or token is missing, or the custom API
    /// URL is malformed.
    pub fn from_settings(settings: &GlobalSettings) -> Result<Self> {
        settings.require_applicable()?;

        let client = Self::new(&settings.credentials());
        match settings.api_url.as_deref() {
            Some(api_url) => client.with_api_url(api_url),
            None => Ok(client),
        }
    }

    /// Use a custom Bot API server.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        let url = url::Url::parse(api_url).map_err(|e| TelegramError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;
        self.bot = self.bot.set_api_url(url);
        Ok(self)
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Get the bot's username from the API.
    pub async fn get_me(&self) -> Result<String> {
        let me = tokio::time::timeout(self.timeout, self.bot.get_me().send())
            .await
            .map_err(|_| TelegramError::GetMeFailed(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| TelegramError::GetMeFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Check that the token belongs to the configured bot.
    ///
    /// Returns the username reported by the API. A mismatch is logged but
    /// not treated as an error.
    pub async fn verify(&self) -> Result<String> {
        let actual = self.get_me().await?;
        if !user_names_match(&self.user_name, &actual) {
            warn!(
                configured = %self.user_name,
                actual = %actual,
                "Bot token belongs to a different bot than configured"
            );
        }
        Ok(actual)
    }
}

/// Compare user names ignoring case and a leading `@`.
pub fn user_names_match(configured: &str, actual: &str) -> bool {
    configured
        .trim_start_matches('@')
        .eq_ignore_ascii_case(actual.trim_start_matches('@'))
}

fn to_bot_error(e: RequestError) -> BotError {
    match e {
        RequestError::Network(e) => BotError::Network(e.to_string()),
        RequestError::Io(e) => BotError::Network(e.to_string()),
        other => BotError::Api(other.to_string()),
    }
}

#[async_trait]
impl BotClient for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> std::result::Result<(), BotError> {
        let request = self.bot.send_message(ChatId(chat_id), text).send();

        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(message)) => {
                debug!(chat_id, message_id = message.id.0, "Message sent");
                Ok(())
            }
            Ok(Err(e)) => Err(to_bot_error(e)),
            Err(_) => Err(BotError::Timeout(self.timeout)),
        }
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
