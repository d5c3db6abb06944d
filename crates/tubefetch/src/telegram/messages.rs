//! User-facing texts. Everything is sent with `ParseMode::Html`.

use indoc::{formatdoc, indoc};
use teloxide::utils::html::escape;
use tubecore::core::utils::format_file_size;
use tubecore::download::VideoInfo;
use tubecore::{DownloadFailure, DownloadOutcome, Inventory, Settings, StagedFile, SweepReport};

pub const WELCOME_MESSAGE: &str = indoc! {"
    👋 <b>Welcome to TubeFetch!</b>

    Send me a YouTube link and I will bring you the video or an MP3.
    Pick what you want below, or just paste a link.
"};

pub const INVALID_URL_MESSAGE: &str = indoc! {"
    ❌ That does not look like a YouTube link.

    Supported forms:
    • youtube.com/watch?v=…
    • youtu.be/…
    • youtube.com/embed/…
    • m.youtube.com/watch?v=…
"};

pub const EXPIRED_REQUEST_MESSAGE: &str = "⌛ This request has expired. Please send the link again.";

pub const ADMIN_ONLY_MESSAGE: &str = "🔒 This command is for administrators only.";

pub const SEND_LINK_VIDEO: &str = "📥 Video mode. Send me a YouTube link and choose the quality.";

pub const SEND_LINK_AUDIO: &str = "🎵 MP3 mode. Send me a YouTube link and I will extract the audio.";

pub const DOWNLOADING_MESSAGE: &str = "⏳ Downloading…";

pub const UPLOADING_MESSAGE: &str = "📤 Uploading…";

pub const METADATA_FAILED_MESSAGE: &str = "❌ Could not read this video. It may be private, removed or age restricted.";

pub const UPLOAD_FAILED_MESSAGE: &str = "❌ Telegram rejected the upload. Please try again later.";

pub fn help_message(settings: &Settings) -> String {
    formatdoc! {"
        📌 <b>How to use</b>

        1. Send a YouTube link.
        2. Choose a quality (144p to 4K) or MP3 320kbps.
        3. Wait for the file.

        <b>Limits</b>
        • Regular videos and MP3: up to {regular}
        • 4K videos: up to {uhd}
        • A download is abandoned after {timeout} seconds

        /start opens the menu again.",
        regular = format_file_size(settings.max_file_size),
        uhd = format_file_size(settings.max_file_size_4k),
        timeout = settings.download_timeout_secs,
    }
}

pub fn about_message() -> String {
    formatdoc! {"
        ℹ️ <b>TubeFetch</b> v{version}

        Downloads YouTube videos in 7 qualities and audio as MP3 320kbps.
        Powered by yt-dlp and ffmpeg.",
        version = env!("CARGO_PKG_VERSION"),
    }
}

/// Reply for every outcome except `Success`, which is delivered as a file
pub fn outcome_message(outcome: &DownloadOutcome) -> String {
    match outcome {
        DownloadOutcome::Success(file) => format!("✅ Done: {}", format_file_size(file.size)),
        DownloadOutcome::TooLarge { size, limit } => format!(
            "📦 The file is too large for Telegram ({} > {}). Try a lower quality.",
            format_file_size(*size),
            format_file_size(*limit)
        ),
        DownloadOutcome::TimedOut => "⏱ The download took too long and was cancelled. Try a lower quality.".to_string(),
        DownloadOutcome::Failed(DownloadFailure::NotFound { .. }) => {
            "❓ The download finished but the file could not be found. Please try again.".to_string()
        }
        DownloadOutcome::Failed(_) => "❌ Download failed. The video may be unavailable in this format.".to_string(),
    }
}

pub fn preview_message(info: &VideoInfo) -> String {
    let mut text = format!(
        "🎬 <b>{}</b>\n👤 {}\n⏱ {}\n👁 {} views",
        escape(&info.title),
        escape(&info.channel),
        info.duration_label(),
        info.views_label()
    );
    if let Some(date) = info.upload_date_label() {
        text.push_str(&format!("\n📅 {}", escape(&date)));
    }
    text.push_str("\n\nChoose a format:");
    text
}

pub fn caption(title: Option<&str>, file: &StagedFile) -> String {
    match title {
        Some(title) => format!("🎬 {}\n📦 {}", escape(title), format_file_size(file.size)),
        None => format!("📦 {}", format_file_size(file.size)),
    }
}

pub fn inventory_message(inventory: &Inventory) -> String {
    if inventory.files.is_empty() {
        return "📂 The staging directory is empty.".to_string();
    }

    let mut text = format!(
        "📂 <b>{} staged files</b> ({})\n",
        inventory.files.len(),
        inventory.total_size_formatted()
    );
    for file in &inventory.files {
        text.push_str(&format!(
            "\n• <code>{}</code> {} ({})",
            escape(&file.name),
            file.size_formatted,
            file.modified.format("%Y-%m-%d %H:%M")
        ));
    }
    text
}

pub fn sweep_message(report: &SweepReport) -> String {
    if report.skipped {
        return "🧹 Auto-delete is on; files are removed right after delivery.".to_string();
    }
    let mut text = format!(
        "🧹 Cleanup done: scanned {}, removed {}.",
        report.scanned,
        report.removed.len()
    );
    if !report.is_clean() {
        text.push_str(&format!("\n⚠️ {} files could not be removed.", report.failures.len()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn info() -> VideoInfo {
        VideoInfo {
            title: "Tom & Jerry <live>".to_string(),
            channel: "Cartoons".to_string(),
            duration: 3725,
            thumbnail: None,
            description: String::new(),
            view_count: 1_234_567,
            upload_date: Some("20091025".to_string()),
        }
    }

    #[test]
    fn test_outcome_messages_are_distinct() {
        let outcomes = [
            DownloadOutcome::TooLarge {
                size: 100 * 1024 * 1024,
                limit: 80 * 1024 * 1024,
            },
            DownloadOutcome::TimedOut,
            DownloadOutcome::Failed(DownloadFailure::NotFound {
                prefix: "video_1_".to_string(),
            }),
            DownloadOutcome::Failed(DownloadFailure::Engine("boom".to_string())),
        ];
        let texts: std::collections::HashSet<String> = outcomes.iter().map(outcome_message).collect();
        assert_eq!(texts.len(), outcomes.len());
        assert!(outcome_message(&outcomes[0]).contains("100.0MB > 80.0MB"));
    }

    #[test]
    fn test_preview_escapes_html() {
        let text = preview_message(&info());
        assert!(text.contains("Tom &amp; Jerry &lt;live&gt;"));
        assert!(text.contains("01:02:05"));
        assert!(text.contains("1,234,567 views"));
        assert!(text.contains("2009-10-25"));
    }

    #[test]
    fn test_help_lists_ceilings() {
        let text = help_message(&Settings::default());
        assert!(text.contains("80.0MB"));
        assert!(text.contains("200.0MB"));
        assert!(text.contains("300 seconds"));
    }

    #[test]
    fn test_sweep_message() {
        assert!(sweep_message(&SweepReport {
            skipped: true,
            ..SweepReport::default()
        })
        .contains("Auto-delete"));

        let report = SweepReport {
            scanned: 3,
            removed: vec!["a".into()],
            failures: vec![("b".into(), "denied".to_string())],
            ..SweepReport::default()
        };
        assert_eq!(
            sweep_message(&report),
            "🧹 Cleanup done: scanned 3, removed 1.\n⚠️ 1 files could not be removed."
        );
    }

    #[test]
    fn test_empty_inventory() {
        assert_eq!(
            inventory_message(&Inventory::default()),
            "📂 The staging directory is empty."
        );
    }
}
