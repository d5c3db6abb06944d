//! Plain text messages: links to download

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tubecore::core::validation::is_valid_youtube_url;
use tubecore::Variant;

use super::types::{sender_id, sender_username, HandlerDeps, HandlerError};
use crate::telegram::delivery::{spawn_delivery, DeliveryJob};
use crate::telegram::keyboards;
use crate::telegram::messages;
use crate::telegram::session::Mode;

pub async fn handle_text(bot: Bot, msg: Message, deps: HandlerDeps) -> Result<(), HandlerError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let url = text.trim();

    if !is_valid_youtube_url(url) {
        bot.send_message(msg.chat.id, messages::INVALID_URL_MESSAGE)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }

    let user_id = sender_id(msg.from.as_ref());
    let username = sender_username(msg.from.as_ref());

    if deps.sessions.mode(msg.chat.id.0) == Mode::Audio {
        let job = DeliveryJob {
            chat_id: msg.chat.id,
            user_id,
            username,
            url: url.to_string(),
            variant: Variant::Audio,
            title: None,
        };
        spawn_delivery(bot, deps, job);
        return Ok(());
    }

    let info = match deps.downloader.video_info(url).await {
        Ok(info) => info,
        Err(e) => {
            log::warn!("Metadata lookup failed for {}: {}", url, e);
            bot.send_message(msg.chat.id, messages::METADATA_FAILED_MESSAGE).await?;
            return Ok(());
        }
    };

    let key = deps.sessions.remember_link(url, Some(info.title.clone()));
    bot.send_message(msg.chat.id, messages::preview_message(&info))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::quality_keyboard(key))
        .await?;

    Ok(())
}
