//! Live yt-dlp checks. Need network and yt-dlp + ffmpeg in PATH.
//!
//! Run with: cargo test -p tubecore --test ytdlp_test -- --ignored

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tubecore::download::engine::MediaEngine;
use tubecore::download::YtDlpEngine;
use tubecore::{DownloadOutcome, DownloadRequest, Downloader, RetentionManager, Settings, Variant};

const URL: &str = "https://youtu.be/jNQXAC9IVRw";

fn which(bin: &str) -> bool {
    Command::new("bash")
        .arg("-lc")
        .arg(format!("command -v {} >/dev/null 2>&1", bin))
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[test]
#[ignore]
fn extract_info_with_ytdlp() {
    if !which("yt-dlp") {
        eprintln!("yt-dlp not found in PATH; skipping test");
        return;
    }

    let engine = YtDlpEngine::new("yt-dlp", Duration::from_secs(120));
    let info = engine.extract_info(URL).expect("metadata");
    assert!(!info.title.is_empty());
    assert!(info.duration > 0);
}

#[tokio::test]
#[ignore]
async fn download_audio_with_ytdlp() {
    if !which("yt-dlp") || !which("ffmpeg") {
        eprintln!("yt-dlp or ffmpeg not found in PATH; skipping test");
        return;
    }

    let tmp = TempDir::new().unwrap();
    let settings = Arc::new(Settings {
        staging_dir: tmp.path().to_string_lossy().into_owned(),
        ..Settings::default()
    });
    let engine = Arc::new(YtDlpEngine::from_settings(&settings));
    let retention = Arc::new(RetentionManager::from_settings(Arc::clone(&settings)));
    let downloader = Downloader::new(settings, engine, retention);

    let request = DownloadRequest::new(URL, Variant::Audio, 1).unwrap();
    match downloader.download(&request).await {
        DownloadOutcome::Success(staged) => {
            assert!(staged.file_name().ends_with(".mp3"));
            assert!(staged.size > 0);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
