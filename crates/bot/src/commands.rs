//! Bot command definitions
//!
//! Defines all Telegram bot commands and their parsing logic

use teloxide::utils::command::BotCommands;

/// All bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "Now Playing bot commands:"
)]
pub enum Command {
    /// Optional deep-link payload, e.g. `spotify_log_in` from the inline button
    #[command(description = "Log in with your Spotify account")]
    Start(String),

    #[command(description = "Show help message")]
    Help,
}
