//! Global notifier settings.
//!
//! Settings are shared by every job: the bot account, whether to echo
//! messages into the build log, and the chats that get every notification.
//! They are stored as JSON in [`crate::config::settings_file`] and can be
//! overridden from the environment so the token need not live on disk.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::BotCredentials;
use crate::error::{NotifierError, Result};
use crate::recipients::{parse_recipients, RecipientSource};

/// Environment variable overriding the bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable overriding the bot user name.
pub const BOT_USER_NAME_ENV: &str = "TELEGRAM_BOT_USERNAME";

/// Environment variable overriding the global notify-user list.
pub const GLOBAL_USERS_ENV: &str = "NOTIFIER_GLOBAL_USERS";

/// Settings shared by every job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub bot_user_name: String,
    #[serde(default)]
    pub bot_token: String,
    /// Echo each notification into the build log.
    #[serde(default)]
    pub show_log: bool,
    /// `#`-delimited chat IDs notified for every job.
    #[serde(default)]
    pub global_notify_users: String,
    /// Custom Bot API server, e.g. a self-hosted one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Partial update applied by `configure`.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub bot_user_name: Option<String>,
    pub bot_token: Option<String>,
    pub show_log: Option<bool>,
    pub global_notify_users: Option<String>,
    pub api_url: Option<String>,
}

impl GlobalSettings {
    /// Load settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            NotifierError::SettingsError(format!("{}: {}", path.display(), e))
        })
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "Saved settings file");
        Ok(())
    }

    /// Override fields from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override fields from `lookup`. Unset or empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = non_empty(BOT_TOKEN_ENV) {
            self.bot_token = token;
        }
        if let Some(user_name) = non_empty(BOT_USER_NAME_ENV) {
            self.bot_user_name = user_name;
        }
        if let Some(users) = non_empty(GLOBAL_USERS_ENV) {
            self.global_notify_users = users;
        }
    }

    /// Merge the provided fields into these settings.
    pub fn update(&mut self, update: SettingsUpdate) {
        if let Some(user_name) = update.bot_user_name {
            self.bot_user_name = user_name;
        }
        if let Some(token) = update.bot_token {
            self.bot_token = token;
        }
        if let Some(show_log) = update.show_log {
            self.show_log = show_log;
        }
        if let Some(users) = update.global_notify_users {
            self.global_notify_users = users;
        }
        if let Some(api_url) = update.api_url {
            self.api_url = Some(api_url).filter(|u| !u.is_empty());
        }
    }

    pub fn credentials(&self) -> BotCredentials {
        BotCredentials::new(&self.bot_user_name, &self.bot_token)
    }

    /// The notifier can only run with both a bot user name and a token.
    pub fn is_applicable(&self) -> bool {
        self.credentials().is_complete()
    }

    /// Fail with [`NotifierError::NotConfigured`] unless applicable.
    pub fn require_applicable(&self) -> Result<()> {
        if let FieldCheck::Error(msg) = check_bot_user_name(&self.bot_user_name) {
            return Err(NotifierError::NotConfigured(msg));
        }
        if let FieldCheck::Error(msg) = check_bot_token(&self.bot_token) {
            return Err(NotifierError::NotConfigured(msg));
        }
        Ok(())
    }

    /// Run every field check, labelled by field name.
    pub fn check_all(&self) -> Vec<(&'static str, FieldCheck)> {
        vec![
            ("bot_user_name", check_bot_user_name(&self.bot_user_name)),
            ("bot_token", check_bot_token(&self.bot_token)),
            (
                "global_notify_users",
                check_recipients(&self.global_notify_users, RecipientSource::GlobalNotifyUsers),
            ),
        ]
    }
}

/// Result of validating a single settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Ok,
    Error(String),
}

impl FieldCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, FieldCheck::Ok)
    }
}

pub fn check_bot_user_name(value: &str) -> FieldCheck {
    if value.is_empty() {
        return FieldCheck::Error("Bot user name is required".to_string());
    }
    FieldCheck::Ok
}

pub fn check_bot_token(value: &str) -> FieldCheck {
    if value.is_empty() {
        return FieldCheck::Error("Bot token is required".to_string());
    }
    FieldCheck::Ok
}

/// Check that every token of a recipient list is a chat ID.
pub fn check_recipients(value: &str, list: RecipientSource) -> FieldCheck {
    match parse_recipients(value, list) {
        Ok(_) => FieldCheck::Ok,
        Err(e) => FieldCheck::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> GlobalSettings {
        GlobalSettings {
            bot_user_name: "ci_bot".to_string(),
            bot_token: "123:abc".to_string(),
            show_log: true,
            global_notify_users: "1#2".to_string(),
            api_url: None,
        }
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = GlobalSettings::load(&temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, GlobalSettings::default());
        assert!(!settings.is_applicable());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");

        let settings = configured();
        settings.save(&path).unwrap();

        let loaded = GlobalSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"bot_user_name": "ci_bot"}"#).unwrap();

        let loaded = GlobalSettings::load(&path).unwrap();
        assert_eq!(loaded.bot_user_name, "ci_bot");
        assert!(loaded.bot_token.is_empty());
        assert!(!loaded.show_log);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let err = GlobalSettings::load(&path).unwrap_err();
        assert!(matches!(err, NotifierError::SettingsError(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (BOT_TOKEN_ENV, "999:zzz"),
            (BOT_USER_NAME_ENV, ""),
            (GLOBAL_USERS_ENV, "7#8"),
        ]
        .into_iter()
        .collect();

        let mut settings = configured();
        settings.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.bot_token, "999:zzz");
        // Empty values don't override
        assert_eq!(settings.bot_user_name, "ci_bot");
        assert_eq!(settings.global_notify_users, "7#8");
    }

    #[test]
    fn test_update_merges_fields() {
        let mut settings = configured();
        settings.update(SettingsUpdate {
            show_log: Some(false),
            api_url: Some("http://localhost:8081".to_string()),
            ..Default::default()
        });

        assert!(!settings.show_log);
        assert_eq!(settings.api_url.as_deref(), Some("http://localhost:8081"));
        assert_eq!(settings.bot_token, "123:abc");

        settings.update(SettingsUpdate {
            api_url: Some(String::new()),
            ..Default::default()
        });
        assert!(settings.api_url.is_none());
    }

    #[test]
    fn test_applicable_requires_both_fields() {
        assert!(configured().is_applicable());
        assert!(configured().require_applicable().is_ok());

        let mut settings = configured();
        settings.bot_token.clear();
        assert!(!settings.is_applicable());
        let err = settings.require_applicable().unwrap_err();
        assert_eq!(err.to_string(), "Notifier is not configured: Bot token is required");
    }

    #[test]
    fn test_field_checks() {
        assert!(check_bot_user_name("ci_bot").is_ok());
        assert_eq!(
            check_bot_user_name(""),
            FieldCheck::Error("Bot user name is required".to_string())
        );
        assert!(check_bot_token("123:abc").is_ok());
        assert!(!check_bot_token("").is_ok());
        assert!(check_recipients("1#2", RecipientSource::Receivers).is_ok());
        assert_eq!(
            check_recipients("1#two", RecipientSource::Receivers),
            FieldCheck::Error("Invalid recipient ID \"two\" in receivers".to_string())
        );
    }

    #[test]
    fn test_check_all() {
        let mut settings = configured();
        settings.global_notify_users = "x".to_string();
        let checks = settings.check_all();
        assert_eq!(checks.len(), 3);
        assert!(checks[0].1.is_ok());
        assert!(checks[1].1.is_ok());
        assert!(!checks[2].1.is_ok());
    }
}
