//! Runs one download for a chat and delivers the result.
//!
//! Each job runs on its own task so a slow download never holds up the
//! dispatcher. Telegram errors are logged, never propagated: every attempt
//! ends with its `DOWNLOAD_LOG` line.

use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode};
use tubecore::core::logging::log_download;
use tubecore::download::MediaKind;
use tubecore::{DownloadOutcome, DownloadRequest, StagedFile, Variant};

use crate::telegram::handlers::HandlerDeps;
use crate::telegram::messages;

/// Everything needed to run a download on behalf of a chat
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub chat_id: ChatId,
    pub user_id: i64,
    pub username: Option<String>,
    pub url: String,
    pub variant: Variant,
    /// Shown in the caption when metadata was fetched beforehand
    pub title: Option<String>,
}

pub fn spawn_delivery(bot: Bot, deps: HandlerDeps, job: DeliveryJob) {
    tokio::spawn(async move {
        deliver(&bot, &deps, job).await;
    });
}

/// Downloads, uploads and releases one job. Returns whether the file reached the chat.
pub async fn deliver(bot: &Bot, deps: &HandlerDeps, job: DeliveryJob) -> bool {
    let request = match DownloadRequest::new(job.url.as_str(), job.variant.clone(), job.user_id) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected request from user {}: {}", job.user_id, e);
            if let Err(e) = bot
                .send_message(job.chat_id, messages::INVALID_URL_MESSAGE)
                .parse_mode(ParseMode::Html)
                .await
            {
                log::warn!("Failed to reply to chat {}: {}", job.chat_id, e);
            }
            log_download(job.user_id, job.username.as_deref(), &job.url, job.variant.label(), false);
            return false;
        }
    };

    let status = match bot.send_message(job.chat_id, messages::DOWNLOADING_MESSAGE).await {
        Ok(message) => Some(message.id),
        Err(e) => {
            log::warn!("Failed to post status to chat {}: {}", job.chat_id, e);
            None
        }
    };

    let outcome = deps.downloader.download(&request).await;
    log::info!("Download for user {} finished: {}", job.user_id, outcome.label());

    let delivered = match outcome {
        DownloadOutcome::Success(file) => {
            set_status(bot, job.chat_id, status, messages::UPLOADING_MESSAGE.to_string()).await;

            let sent = send_staged(bot, job.chat_id, &file, job.title.as_deref()).await;
            match &sent {
                Ok(_) => {
                    if let Some(id) = status {
                        bot.delete_message(job.chat_id, id).await.ok();
                    }
                }
                Err(e) => {
                    log::error!("Failed to upload {}: {}", file.path.display(), e);
                    set_status(bot, job.chat_id, status, messages::UPLOAD_FAILED_MESSAGE.to_string()).await;
                }
            }

            if let Err(e) = deps.retention.release(&file.path, false) {
                log::error!("Failed to release {}: {}", file.path.display(), e);
            }
            sent.is_ok()
        }
        other => {
            set_status(bot, job.chat_id, status, messages::outcome_message(&other)).await;
            false
        }
    };

    log_download(
        job.user_id,
        job.username.as_deref(),
        request.url(),
        request.variant().label(),
        delivered,
    );
    delivered
}

/// Edits the status message, or posts the text when there is none
async fn set_status(bot: &Bot, chat_id: ChatId, status: Option<MessageId>, text: String) {
    let result = match status {
        Some(id) => bot.edit_message_text(chat_id, id, text).await,
        None => bot.send_message(chat_id, text).await,
    };
    if let Err(e) = result {
        log::warn!("Failed to update status in chat {}: {}", chat_id, e);
    }
}

async fn send_staged(bot: &Bot, chat_id: ChatId, file: &StagedFile, title: Option<&str>) -> ResponseResult<Message> {
    let caption = messages::caption(title, file);
    let input = InputFile::file(file.path.clone());

    match file.kind {
        MediaKind::Audio => {
            bot.send_audio(chat_id, input)
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .await
        }
        MediaKind::Video => {
            bot.send_video(chat_id, input)
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .supports_streaming(true)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tubecore::download::engine::{EngineError, FetchOptions, MediaEngine, VideoInfo};
    use tubecore::{Downloader, RetentionManager, Settings};

    use crate::telegram::session::SessionStore;

    struct UnavailableEngine;

    impl MediaEngine for UnavailableEngine {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn extract_info(&self, _url: &str) -> Result<VideoInfo, EngineError> {
            Err(EngineError::Other("Video unavailable".to_string()))
        }

        fn fetch(&self, _url: &str, _options: &FetchOptions) -> Result<(), EngineError> {
            Err(EngineError::Other("Video unavailable".to_string()))
        }
    }

    fn deps(dir: &Path) -> HandlerDeps {
        let settings = Arc::new(Settings {
            staging_dir: dir.to_string_lossy().into_owned(),
            ..Settings::default()
        });
        let retention = Arc::new(RetentionManager::from_settings(Arc::clone(&settings)));
        let downloader = Arc::new(Downloader::new(
            Arc::clone(&settings),
            Arc::new(UnavailableEngine),
            Arc::clone(&retention),
        ));
        HandlerDeps::new(settings, downloader, retention, Arc::new(SessionStore::new()))
    }

    /// Bot whose API calls fail with a connection error
    fn offline_bot() -> Bot {
        Bot::new("123456:TEST").set_api_url(url::Url::parse("http://127.0.0.1:1/").unwrap())
    }

    fn job(url: &str) -> DeliveryJob {
        DeliveryJob {
            chat_id: ChatId(42),
            user_id: 42,
            username: Some("tester".to_string()),
            url: url.to_string(),
            variant: Variant::Audio,
            title: None,
        }
    }

    #[tokio::test]
    async fn test_failed_download_completes_when_telegram_is_unreachable() {
        let tmp = TempDir::new().unwrap();
        let delivered = deliver(&offline_bot(), &deps(tmp.path()), job("https://youtu.be/dQw4w9WgXcQ")).await;
        assert!(!delivered);
    }

    #[tokio::test]
    async fn test_rejected_url_completes_when_telegram_is_unreachable() {
        let tmp = TempDir::new().unwrap();
        let delivered = deliver(&offline_bot(), &deps(tmp.path()), job("https://vimeo.com/12345")).await;
        assert!(!delivered);
    }
}
