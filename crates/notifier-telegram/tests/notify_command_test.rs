//! Integration tests for the notify and configure commands.
//!
//! None of these reach the Bot API: they cover the paths that finish before
//! any request is made.

use std::time::Duration;

use notifier_core::{BuildResult, DispatchError, GlobalSettings, SettingsUpdate};
use notifier_telegram::{configure, notify, NotifyRequest, TelegramError};

fn request(result: BuildResult, receivers: &str, notify_on_success: bool) -> NotifyRequest {
    NotifyRequest {
        project: "backend #128".to_string(),
        result,
        receivers: receivers.to_string(),
        template: String::new(),
        notify_on_success,
        max_concurrency: 4,
        timeout: Duration::from_secs(1),
    }
}

fn configured_settings() -> GlobalSettings {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("settings.json");
    configure(
        &path,
        SettingsUpdate {
            bot_user_name: Some("ci_bot".to_string()),
            bot_token: Some("123:abc".to_string()),
            global_notify_users: Some("1#2".to_string()),
            ..Default::default()
        },
    )
    .unwrap()
}

#[tokio::test]
async fn test_successful_build_is_skipped_without_condition() {
    let settings = configured_settings();

    let report = notify(&settings, &request(BuildResult::Success, "3", false))
        .await
        .unwrap();

    assert!(!report.notified);
    assert_eq!(report.recipients, 0);
}

#[tokio::test]
async fn test_invalid_receivers_fail_before_sending() {
    let settings = configured_settings();

    let err = notify(&settings, &request(BuildResult::Failure, "3#oops", false))
        .await
        .unwrap_err();

    match err {
        TelegramError::Dispatch(DispatchError::InvalidRecipientId(e)) => {
            assert_eq!(e.token, "oops");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unconfigured_bot_is_rejected() {
    let err = notify(
        &GlobalSettings::default(),
        &request(BuildResult::Failure, "3", false),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Notifier is not configured: Bot user name is required"
    );
}
