//! Handler dependencies and small helpers shared by the handlers

use std::sync::Arc;

use teloxide::types::User;
use tubecore::{Downloader, RetentionManager, Settings};

use crate::telegram::session::SessionStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub settings: Arc<Settings>,
    pub downloader: Arc<Downloader>,
    pub retention: Arc<RetentionManager>,
    pub sessions: Arc<SessionStore>,
}

impl HandlerDeps {
    pub fn new(
        settings: Arc<Settings>,
        downloader: Arc<Downloader>,
        retention: Arc<RetentionManager>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            settings,
            downloader,
            retention,
            sessions,
        }
    }
}

/// Telegram user id as a signed integer, 0 when it does not fit
pub fn sender_id(user: Option<&User>) -> i64 {
    user.and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0)
}

pub fn sender_username(user: Option<&User>) -> Option<String> {
    user.and_then(|u| u.username.clone())
}
