//! Inline keyboards and callback data.
//!
//! Callback data formats:
//! - `menu:video`, `menu:audio`, `menu:help`, `menu:about`, `menu:back`
//! - `dl:{link_key}:{variant}` where variant is a quality label or `audio`

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tubecore::{Variant, VideoQuality};

const QUALITIES_PER_ROW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Video,
    Audio,
    Help,
    About,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Menu(MenuAction),
    Download { key: u64, variant: Variant },
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(item) = data.strip_prefix("menu:") {
            let action = match item {
                "video" => MenuAction::Video,
                "audio" => MenuAction::Audio,
                "help" => MenuAction::Help,
                "about" => MenuAction::About,
                "back" => MenuAction::Back,
                _ => return None,
            };
            return Some(CallbackAction::Menu(action));
        }

        let rest = data.strip_prefix("dl:")?;
        let (key, label) = rest.split_once(':')?;
        let key = key.parse().ok()?;
        if label.is_empty() {
            return None;
        }
        let variant = label.parse().ok()?;
        Some(CallbackAction::Download { key, variant })
    }
}

pub fn download_callback(key: u64, variant: &Variant) -> String {
    format!("dl:{}:{}", key, variant.label())
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("📥 Download Video", "menu:video"),
            InlineKeyboardButton::callback("🎵 Download MP3", "menu:audio"),
        ],
        vec![
            InlineKeyboardButton::callback("📌 Help", "menu:help"),
            InlineKeyboardButton::callback("ℹ️ About", "menu:about"),
        ],
    ])
}

pub fn back_to_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("🔙 Back", "menu:back")]])
}

/// Seven qualities, three per row, then MP3
pub fn quality_keyboard(key: u64) -> InlineKeyboardMarkup {
    let qualities: Vec<VideoQuality> = VideoQuality::all().collect();
    let mut rows: Vec<Vec<InlineKeyboardButton>> = qualities
        .chunks(QUALITIES_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|quality| {
                    InlineKeyboardButton::callback(
                        format!("📹 {}", quality),
                        download_callback(key, &Variant::video(*quality)),
                    )
                })
                .collect()
        })
        .collect();

    rows.push(vec![InlineKeyboardButton::callback(
        "🎵 MP3 320kbps",
        download_callback(key, &Variant::Audio),
    )]);

    InlineKeyboardMarkup::new(rows)
}
