//! Build-completion notification dispatch.
//!
//! The [`NotificationDispatcher`] is the whole notification step of a build:
//!
//! 1. Compose the message text from the template and the build outcome.
//! 2. Echo the text to the build log when `show_log` is set.
//! 3. Decide whether to notify: failed builds always notify, successful
//!    builds only when the job's `condition` flag is set.
//! 4. Merge the global and per-job recipient lists into one deduplicated set.
//!    A malformed chat ID aborts the dispatch before anything is sent.
//! 5. Send one message per chat, a bounded number at a time. A failed send
//!    is logged and collected; the remaining chats are still attempted.
//!
//! The dispatcher never touches the build's own result. It only reports
//! whether the notification step itself went through.

use std::fmt;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::build_log::BuildLog;
use crate::client::{BotClient, BotError};
use crate::message::compose_message;
use crate::outcome::BuildOutcome;
use crate::recipients::{InvalidRecipientId, RecipientSet};

/// Default number of sends in flight at once.
const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Per-job notification settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Optional prefix for the message; empty means none.
    #[serde(default)]
    pub message_template: String,
    /// Notify on successful builds too.
    #[serde(default)]
    pub condition: bool,
    /// Echo the message to the build log.
    #[serde(default)]
    pub show_log: bool,
}

impl NotificationConfig {
    /// Whether a build with this outcome should trigger a notification.
    pub fn should_notify(&self, outcome: &BuildOutcome) -> bool {
        !outcome.is_success() || self.condition
    }
}

/// Tuning for the recipient fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Maximum number of concurrent sends. Values below 1 are treated as 1.
    pub max_concurrency: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Summary of a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// A notification was due and sends were attempted.
    pub notified: bool,
    /// Number of distinct chats addressed.
    pub recipients: usize,
    /// Number of chats the message reached.
    pub delivered: usize,
}

impl DispatchReport {
    fn skipped() -> Self {
        Self::default()
    }
}

/// A send that failed for one chat.
#[derive(Debug, Clone)]
pub struct SendFailure {
    pub chat_id: i64,
    pub error: BotError,
}

impl fmt::Display for SendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat {}: {}", self.chat_id, self.error)
    }
}

/// Errors from a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A recipient list holds a malformed chat ID; nothing was sent.
    #[error(transparent)]
    InvalidRecipientId(#[from] InvalidRecipientId),

    /// One or more sends failed; the others were still attempted.
    #[error(
        "{} of {} notifications failed: {}",
        .failures.len(),
        .report.recipients,
        join_failures(.failures)
    )]
    SendFailed {
        report: DispatchReport,
        failures: Vec<SendFailure>,
    },
}

impl DispatchError {
    /// Whether sends were attempted before the error was raised.
    pub fn notified(&self) -> bool {
        matches!(self, DispatchError::SendFailed { .. })
    }
}

fn join_failures(failures: &[SendFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Sends build-completion notifications through a [`BotClient`].
pub struct NotificationDispatcher<C, L> {
    client: C,
    log: L,
    options: DispatchOptions,
}

impl<C: BotClient, L: BuildLog> NotificationDispatcher<C, L> {
    /// Create a dispatcher with default options.
    pub fn new(client: C, log: L) -> Self {
        Self {
            client,
            log,
            options: DispatchOptions::default(),
        }
    }

    /// Replace the fan-out options.
    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    /// Run the notification step for a finished build.
    ///
    /// Returns `Ok` with `notified == false` when no notification was due,
    /// `Ok` with `notified == true` when every chat was reached, and
    /// [`DispatchError::SendFailed`] when at least one send failed.
    pub async fn dispatch(
        &self,
        outcome: &BuildOutcome,
        config: &NotificationConfig,
        global_notify_users: &str,
        receivers: &str,
    ) -> Result<DispatchReport, DispatchError> {
        let message = compose_message(outcome, &config.message_template);

        if config.show_log {
            self.log.println(&message);
        }

        if !config.should_notify(outcome) {
            debug!(
                build = %outcome.display_name,
                result = %outcome.result,
                "Build succeeded and success notifications are off, skipping"
            );
            return Ok(DispatchReport::skipped());
        }

        let recipients = match RecipientSet::from_lists(global_notify_users, receivers) {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!(list = %e.list, token = %e.token, "Invalid recipient ID, nothing sent");
                self.log
                    .println(&format!("Telegram notification not sent: {}", e));
                return Err(e.into());
            }
        };

        info!(
            build = %outcome.display_name,
            result = %outcome.result,
            recipients = recipients.len(),
            client = self.client.name(),
            "Sending build notification"
        );

        let failures = self.fan_out(&recipients, &message).await;
        let report = DispatchReport {
            notified: true,
            recipients: recipients.len(),
            delivered: recipients.len() - failures.len(),
        };

        if failures.is_empty() {
            info!(delivered = report.delivered, "Build notification delivered");
            Ok(report)
        } else {
            warn!(
                failed = failures.len(),
                delivered = report.delivered,
                "Build notification partially failed"
            );
            Err(DispatchError::SendFailed { report, failures })
        }
    }

    /// Send to every chat, returning the failures ordered by chat ID.
    async fn fan_out(&self, recipients: &RecipientSet, message: &str) -> Vec<SendFailure> {
        let concurrency = self.options.max_concurrency.max(1);

        let mut failures: Vec<SendFailure> = stream::iter(recipients.iter())
            .map(|chat_id| async move {
                match self.client.send_message(chat_id, message).await {
                    Ok(()) => {
                        debug!(chat_id, "Notification sent");
                        None
                    }
                    Err(error) => {
                        warn!(chat_id, error = %error, "Failed to send notification");
                        self.log.println(&format!(
                            "Failed to send Telegram notification to {}: {}",
                            chat_id, error
                        ));
                        Some(SendFailure { chat_id, error })
                    }
                }
            })
            .buffer_unordered(concurrency)
            .filter_map(futures::future::ready)
            .collect()
            .await;

        failures.sort_by_key(|f| f.chat_id);
        failures
    }
}
