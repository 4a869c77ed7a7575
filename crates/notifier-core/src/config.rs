//! Shared configuration paths for the notifier.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.telegram-notifier/
//! └── config/
//!     ├── settings.json   # Global settings (bot account, global recipients)
//!     └── .env.local      # Secrets (TELEGRAM_BOT_TOKEN, ...)
//! ```
//!
//! # Environment Variables
//!
//! - `NOTIFIER_STATE_DIR`: Override the base directory
//! - `NOTIFIER_CONFIG_DIR`: Override the config directory

use std::path::PathBuf;

use tracing::debug;

/// Environment variable for custom base directory.
pub const STATE_DIR_ENV: &str = "NOTIFIER_STATE_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "NOTIFIER_CONFIG_DIR";

/// Default base directory name under home.
const DEFAULT_STATE_DIR: &str = ".telegram-notifier";

const CONFIG_SUBDIR: &str = "config";

/// Get the notifier base directory.
///
/// Determined by:
/// 1. `NOTIFIER_STATE_DIR` environment variable if set
/// 2. `~/.telegram-notifier` if home directory is available
/// 3. `.telegram-notifier` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the config directory.
///
/// Defaults to `~/.telegram-notifier/config/` or `NOTIFIER_CONFIG_DIR` env var.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the global settings file path.
pub fn settings_file() -> PathBuf {
    config_dir().join("settings.json")
}

/// Get the .env.local file path.
///
/// Environment file for secrets (bot token).
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Ensure the config directory exists.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_config_dir() -> std::io::Result<()> {
    let dir = config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Load environment files.
///
/// The config directory's `.env.local` is read first, then a local
/// `.env.local` or `.env`. Variables already set are never overwritten.
pub fn load_env() {
    let env_path = env_file();
    if env_path.exists() {
        if let Err(e) = dotenvy::from_path(&env_path) {
            debug!(path = %env_path.display(), error = %e, "Failed to load env file");
        }
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables can't be isolated between parallel tests, so
    // these only check the file and directory names.

    #[test]
    fn test_state_dir_name() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(DEFAULT_STATE_DIR) || std::env::var(STATE_DIR_ENV).is_ok());
    }

    #[test]
    fn test_config_dir_name() {
        let dir = config_dir();
        assert!(dir.ends_with("config") || std::env::var(CONFIG_DIR_ENV).is_ok());
    }

    #[test]
    fn test_settings_file_name() {
        assert!(settings_file().ends_with("settings.json"));
    }

    #[test]
    fn test_env_file_name() {
        assert!(env_file().ends_with(".env.local"));
    }
}
