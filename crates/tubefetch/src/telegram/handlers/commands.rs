//! Slash command handlers

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html::escape;

use super::types::{sender_id, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::keyboards;
use crate::telegram::messages;
use crate::telegram::sweeper::run_sweep;

pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, deps: HandlerDeps) -> Result<(), HandlerError> {
    log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);

    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, messages::WELCOME_MESSAGE)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::main_menu())
                .await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, messages::help_message(&deps.settings))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::About => {
            bot.send_message(msg.chat.id, messages::about_message())
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::Files => {
            if !is_admin(&bot, &msg, &deps).await? {
                return Ok(());
            }
            let text = match deps.retention.inventory() {
                Ok(inventory) => messages::inventory_message(&inventory),
                Err(e) => {
                    log::error!("Failed to list staged files: {}", e);
                    format!("❌ Could not read the staging directory: {}", escape(&e.to_string()))
                }
            };
            bot.send_message(msg.chat.id, text).parse_mode(ParseMode::Html).await?;
        }
        Command::Cleanup => {
            if !is_admin(&bot, &msg, &deps).await? {
                return Ok(());
            }
            let report = run_sweep(deps.retention.clone()).await;
            bot.send_message(msg.chat.id, messages::sweep_message(&report)).await?;
        }
    }

    Ok(())
}

/// Replies with a refusal when the sender is not an admin
async fn is_admin(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<bool, HandlerError> {
    let user_id = sender_id(msg.from.as_ref());
    if deps.settings.is_admin(user_id) {
        return Ok(true);
    }
    log::warn!("User {} tried an admin command", user_id);
    bot.send_message(msg.chat.id, messages::ADMIN_ONLY_MESSAGE).await?;
    Ok(false)
}
