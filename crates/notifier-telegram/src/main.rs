//! Telegram Notifier binary.
//!
//! Run as the last step of a pipeline:
//! ```bash
//! telegram-notifier notify --project "backend #128" --result "$BUILD_STATUS" --receivers "1001#1002"
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};
use notifier_core::{config, BuildResult, SettingsUpdate};
use notifier_telegram::{commands, TelegramClient};
use tracing_subscriber::EnvFilter;

/// Telegram Notifier - send build results to Telegram chats
#[derive(Parser, Debug)]
#[command(name = "telegram-notifier")]
#[command(about = "Send CI build results to Telegram chats through a bot")]
struct Args {
    /// Settings file (default: ~/.telegram-notifier/config/settings.json)
    #[arg(long, global = true, env = "NOTIFIER_SETTINGS")]
    settings: Option<String>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Notify recipients about a finished build
    Notify {
        /// Full display name of the build, e.g. "backend #128"
        #[arg(long, env = "NOTIFIER_PROJECT")]
        project: String,

        /// Build result: SUCCESS, UNSTABLE, FAILURE, NOT_BUILT or ABORTED
        #[arg(long, env = "NOTIFIER_BUILD_RESULT")]
        result: BuildResult,

        /// Chat IDs for this job, separated by '#'
        #[arg(long, default_value = "")]
        receivers: String,

        /// Text prepended to the message
        #[arg(long, default_value = "")]
        template: String,

        /// Also notify when the build succeeded
        #[arg(long)]
        notify_on_success: bool,

        /// Maximum concurrent sends
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },

    /// Update the stored global settings
    Configure {
        #[arg(long)]
        bot_user_name: Option<String>,

        #[arg(long)]
        bot_token: Option<String>,

        /// Chat IDs notified for every job, separated by '#'
        #[arg(long)]
        global_users: Option<String>,

        /// Echo notifications into the build log (true/false)
        #[arg(long)]
        show_log: Option<bool>,

        /// Custom Bot API server URL (empty to reset)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Validate settings and check the bot token against the API
    Check,
}

/// Load env files, then parse arguments so env-backed flags see them.
fn parse_args<I, T>(itr: I) -> Args
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    config::load_env();
    Args::parse_from(itr)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args(std::env::args_os());

    let filter = match args.verbose {
        0 => "telegram_notifier=info,notifier_telegram=info,notifier_core=info,teloxide=warn",
        1 => "telegram_notifier=debug,notifier_telegram=debug,notifier_core=debug,teloxide=info",
        2 => "telegram_notifier=trace,notifier_telegram=trace,notifier_core=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings_path = args
        .settings
        .as_deref()
        .map(commands::expand_path)
        .unwrap_or_else(config::settings_file);

    match args.command {
        Command::Notify {
            project,
            result,
            receivers,
            template,
            notify_on_success,
            concurrency,
            timeout,
        } => {
            let settings = commands::load_settings(&settings_path)?;
            let request = commands::NotifyRequest {
                project,
                result,
                receivers,
                template,
                notify_on_success,
                max_concurrency: concurrency,
                timeout: Duration::from_secs(timeout),
            };

            match commands::notify(&settings, &request).await {
                Ok(report) => println!("{}", commands::describe_report(&report)),
                Err(e) => {
                    tracing::error!(error = %e, "Notification step failed");
                    return Err(e.into());
                }
            }
        }
        Command::Configure {
            bot_user_name,
            bot_token,
            global_users,
            show_log,
            api_url,
        } => {
            let update = SettingsUpdate {
                bot_user_name,
                bot_token,
                show_log,
                global_notify_users: global_users,
                api_url,
            };
            commands::configure(&settings_path, update)?;
            println!("Settings saved to {}", settings_path.display());
        }
        Command::Check => {
            let settings = commands::load_settings(&settings_path)?;
            println!("Settings: {}", settings_path.display());

            let mut all_ok = true;
            for (field, check) in settings.check_all() {
                match check {
                    notifier_core::FieldCheck::Ok => println!("   {}: ok", field),
                    notifier_core::FieldCheck::Error(message) => {
                        all_ok = false;
                        println!("   {}: {}", field, message);
                    }
                }
            }

            if !settings.is_applicable() {
                println!("\nNotifier is not applicable until bot user name and token are set.");
                return Err("settings incomplete".into());
            }

            let client = TelegramClient::from_settings(&settings)?;
            let actual = client.verify().await?;
            println!("\nBot: @{}", actual);

            if !all_ok {
                return Err("settings contain invalid fields".into());
            }
        }
    }

    Ok(())
}
