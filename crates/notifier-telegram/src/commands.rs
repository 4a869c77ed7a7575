//! Command implementations for the `telegram-notifier` binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notifier_core::{
    check_bot_token, check_bot_user_name, check_recipients, BuildOutcome, BuildResult,
    DispatchOptions, DispatchReport, FieldCheck, GlobalSettings, NotificationConfig,
    NotificationDispatcher, RecipientSource, SettingsUpdate, StdoutBuildLog,
};
use tracing::info;

use crate::client::TelegramClient;
use crate::error::{Result, TelegramError};

/// Expand `~` in a user-supplied settings path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Inputs for a single notification step.
#[derive(Debug, Clone)]
pub struct NotifyRequest {
    pub project: String,
    pub result: BuildResult,
    pub receivers: String,
    pub template: String,
    pub notify_on_success: bool,
    pub max_concurrency: usize,
    pub timeout: Duration,
}

/// Load settings from `path` with environment overrides applied.
pub fn load_settings(path: &Path) -> Result<GlobalSettings> {
    let mut settings = GlobalSettings::load(path)?;
    settings.apply_env();
    Ok(settings)
}

/// Send the build notification described by `request`.
pub async fn notify(settings: &GlobalSettings, request: &NotifyRequest) -> Result<DispatchReport> {
    let client = TelegramClient::from_settings(settings)?.with_timeout(request.timeout);
    let dispatcher = NotificationDispatcher::new(client, StdoutBuildLog).with_options(
        DispatchOptions {
            max_concurrency: request.max_concurrency,
        },
    );

    let outcome = BuildOutcome::new(&request.project, request.result);
    let config = NotificationConfig {
        message_template: request.template.clone(),
        condition: request.notify_on_success,
        show_log: settings.show_log,
    };

    let report = dispatcher
        .dispatch(
            &outcome,
            &config,
            &settings.global_notify_users,
            &request.receivers,
        )
        .await?;
    Ok(report)
}

/// Validate `update`, merge it into the settings at `path` and save them.
pub fn configure(path: &Path, update: SettingsUpdate) -> Result<GlobalSettings> {
    validate_update(&update)?;

    let mut settings = GlobalSettings::load(path)?;
    settings.update(update);
    settings.save(path)?;

    info!(path = %path.display(), "Settings saved");
    Ok(settings)
}

fn validate_update(update: &SettingsUpdate) -> Result<()> {
    let checks = [
        ("bot user name", update.bot_user_name.as_deref().map(check_bot_user_name)),
        ("bot token", update.bot_token.as_deref().map(check_bot_token)),
        (
            "global notify users",
            update
                .global_notify_users
                .as_deref()
                .map(|v| check_recipients(v, RecipientSource::GlobalNotifyUsers)),
        ),
    ];

    for (field, check) in checks {
        if let Some(FieldCheck::Error(message)) = check {
            return Err(TelegramError::InvalidField { field, message });
        }
    }

    if let Some(api_url) = update.api_url.as_deref().filter(|u| !u.is_empty()) {
        url::Url::parse(api_url).map_err(|e| TelegramError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Human-readable summary of a dispatch.
pub fn describe_report(report: &DispatchReport) -> String {
    if !report.notified {
        "Notification skipped: build succeeded and success notifications are off".to_string()
    } else if report.recipients == 0 {
        "Notification due but no recipients are configured".to_string()
    } else {
        format!(
            "Notification delivered to {} of {} chats",
            report.delivered, report.recipients
        )
    }
}
