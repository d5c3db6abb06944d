//! Bot instance creation and the command list

use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show the main menu")]
    Start,
    #[command(description = "how to use the bot")]
    Help,
    #[command(description = "about this bot")]
    About,
    #[command(description = "list staged files (admins only)")]
    Files,
    #[command(description = "remove expired staged files now (admins only)")]
    Cleanup,
}

/// Creates a Bot instance from the validated credential
pub fn create_bot(token: &SecretString) -> Bot {
    Bot::new(token.expose_secret())
}

/// Publishes the command list in the Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
