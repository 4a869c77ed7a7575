//! Telegram build notifications for CI pipelines.
//!
//! This crate connects [`notifier_core`] to the Telegram Bot API and ships
//! the `telegram-notifier` binary that pipelines run as a post-build step.
//!
//! # Environment Variables
//!
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather (overrides settings)
//! - `TELEGRAM_BOT_USERNAME`: Bot user name (overrides settings)
//! - `NOTIFIER_GLOBAL_USERS`: `#`-delimited chats notified for every job
//!
//! # Example
//!
//! ```no_run
//! use notifier_core::{BuildOutcome, BuildResult, GlobalSettings, NotificationConfig};
//! use notifier_core::{NotificationDispatcher, StdoutBuildLog};
//! use notifier_telegram::TelegramClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut settings = GlobalSettings::default();
//!     settings.apply_env();
//!
//!     let client = TelegramClient::from_settings(&settings)?;
//!     let dispatcher = NotificationDispatcher::new(client, StdoutBuildLog);
//!
//!     let outcome = BuildOutcome::new("backend #128", BuildResult::Failure);
//!     dispatcher
//!         .dispatch(&outcome, &NotificationConfig::default(), &settings.global_notify_users, "")
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod commands;
pub mod error;

pub use client::{user_names_match, TelegramClient, DEFAULT_SEND_TIMEOUT};
pub use commands::{configure, describe_report, expand_path, load_settings, notify, NotifyRequest};
pub use error::{Result, TelegramError};
