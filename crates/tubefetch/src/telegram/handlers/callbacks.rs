//! Inline keyboard callbacks

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use super::types::{sender_id, sender_username, HandlerDeps, HandlerError};
use crate::telegram::delivery::{spawn_delivery, DeliveryJob};
use crate::telegram::keyboards::{self, CallbackAction, MenuAction};
use crate::telegram::messages;
use crate::telegram::session::Mode;

pub async fn handle_callback(bot: Bot, q: CallbackQuery, deps: HandlerDeps) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        return Ok(());
    };
    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        log::warn!("Unknown callback data: {:?}", q.data);
        return Ok(());
    };

    match action {
        CallbackAction::Menu(menu) => {
            let (text, markup) = match menu {
                MenuAction::Video => {
                    deps.sessions.set_mode(chat_id.0, Mode::Video);
                    (messages::SEND_LINK_VIDEO.to_string(), keyboards::back_to_menu())
                }
                MenuAction::Audio => {
                    deps.sessions.set_mode(chat_id.0, Mode::Audio);
                    (messages::SEND_LINK_AUDIO.to_string(), keyboards::back_to_menu())
                }
                MenuAction::Help => (messages::help_message(&deps.settings), keyboards::back_to_menu()),
                MenuAction::About => (messages::about_message(), keyboards::back_to_menu()),
                MenuAction::Back => (messages::WELCOME_MESSAGE.to_string(), keyboards::main_menu()),
            };
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(markup)
                .await?;
        }
        CallbackAction::Download { key, variant } => {
            let Some(link) = deps.sessions.link(key) else {
                bot.send_message(chat_id, messages::EXPIRED_REQUEST_MESSAGE).await?;
                return Ok(());
            };
            let job = DeliveryJob {
                chat_id,
                user_id: sender_id(Some(&q.from)),
                username: sender_username(Some(&q.from)),
                url: link.url,
                variant,
                title: link.title,
            };
            spawn_delivery(bot, deps, job);
        }
    }

    Ok(())
}
