//! Notifier Core - build-completion notification logic.
//!
//! This crate holds everything the notifier does independently of the
//! messaging backend:
//!
//! - **outcome**: Finished build description (display name and result)
//! - **recipients**: Parsing `#`-delimited recipient lists into a deduplicated set
//! - **message**: Composing the notification text
//! - **dispatcher**: Deciding whether to notify and fanning out one message per recipient
//! - **client**: The bot client capability the dispatcher sends through
//! - **build_log**: The build log the dispatcher reports to
//! - **settings**: Persisted global settings and field checks
//! - **config**: Shared configuration paths
//!
//! # Example
//!
//! ```no_run
//! use notifier_core::{
//!     BuildOutcome, BuildResult, NotificationConfig, NotificationDispatcher, StdoutBuildLog,
//! };
//! # use notifier_core::{BotClient, BotError};
//! # struct MyClient;
//! # #[async_trait::async_trait]
//! # impl BotClient for MyClient {
//! #     async fn send_message(&self, _: i64, _: &str) -> Result<(), BotError> { Ok(()) }
//! #     fn name(&self) -> &'static str { "mine" }
//! # }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = NotificationDispatcher::new(MyClient, StdoutBuildLog);
//! let outcome = BuildOutcome::new("my-project #42", BuildResult::Failure);
//! let config = NotificationConfig::default();
//!
//! let report = dispatcher.dispatch(&outcome, &config, "1001#1002", "1003").await?;
//! assert!(report.notified);
//! # Ok(())
//! # }
//! ```

pub mod build_log;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod outcome;
pub mod recipients;
pub mod settings;

pub use build_log::{BuildLog, MemoryBuildLog, StdoutBuildLog};
pub use client::{BotClient, BotCredentials, BotError};
pub use config::{config_dir, ensure_config_dir, env_file, load_env, settings_file, state_dir};
pub use dispatcher::{
    DispatchError, DispatchOptions, DispatchReport, NotificationConfig, NotificationDispatcher,
    SendFailure,
};
pub use error::{NotifierError, Result};
pub use message::compose_message;
pub use outcome::{BuildOutcome, BuildResult};
pub use recipients::{parse_recipients, InvalidRecipientId, RecipientSet, RecipientSource};
pub use settings::{
    check_bot_token, check_bot_user_name, check_recipients, FieldCheck, GlobalSettings,
    SettingsUpdate,
};
