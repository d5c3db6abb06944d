//! Media engine capability.
//!
//! The engine is an opaque black box: it either fetches metadata or writes an
//! artifact matching a format selector to disk. Both operations block, so the
//! orchestrator always calls them from tokio's blocking pool.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::config::formats;
use crate::core::utils::{format_count, format_duration};

/// Output template field replaced by the video title
pub const TITLE_FIELD: &str = "%(title)s";

/// Output template field replaced by the container/codec extension
pub const EXT_FIELD: &str = "%(ext)s";

#[derive(Debug, Error)]
pub enum EngineError {
    /// Binary missing or not executable
    #[error("failed to start {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    /// Engine ran and reported failure (network, geo-block, unavailable format, age gate...)
    #[error("{bin} exited with {status}: {stderr}")]
    Failed { bin: String, status: String, stderr: String },

    /// Engine outlived its hard deadline and was killed
    #[error("{bin} killed after {secs}s")]
    Killed { bin: String, secs: u64 },

    #[error("failed to parse engine metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Audio transcode target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioExtraction {
    pub codec: String,
    pub bitrate_kbps: String,
}

impl Default for AudioExtraction {
    fn default() -> Self {
        Self {
            codec: formats::AUDIO_FORMAT.to_string(),
            bitrate_kbps: formats::AUDIO_QUALITY.to_string(),
        }
    }
}

/// Options for a single artifact fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Format selector expression, e.g. `best[height<=720]`
    pub format: String,
    /// Full output path containing [`TITLE_FIELD`] and [`EXT_FIELD`]
    pub output_template: PathBuf,
    /// Transcode to audio after download
    pub audio: Option<AudioExtraction>,
    /// Skip subtitles, descriptions, info json and thumbnails
    pub suppress_sidecars: bool,
}

/// Metadata shown to the user before a download
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub title: String,
    pub channel: String,
    /// Seconds, 0 when unknown
    pub duration: u64,
    pub thumbnail: Option<String>,
    pub description: String,
    pub view_count: u64,
    /// `YYYYMMDD` as reported by the engine
    pub upload_date: Option<String>,
}

impl VideoInfo {
    pub fn duration_label(&self) -> String {
        format_duration(self.duration)
    }

    pub fn views_label(&self) -> String {
        format_count(self.view_count)
    }

    /// `2009-10-25`, or the raw value when it is not `YYYYMMDD`
    pub fn upload_date_label(&self) -> Option<String> {
        self.upload_date.as_deref().map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y%m%d")
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|_| raw.to_string())
        })
    }
}

/// A media extraction/download backend.
pub trait MediaEngine: Send + Sync {
    /// Human-readable name for logs (e.g. "yt-dlp")
    fn name(&self) -> &str;

    /// Metadata only, nothing is written to disk.
    fn extract_info(&self, url: &str) -> Result<VideoInfo, EngineError>;

    /// Writes the artifact described by `options` or fails.
    fn fetch(&self, url: &str, options: &FetchOptions) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> VideoInfo {
        VideoInfo {
            title: "Song".to_string(),
            channel: "Artist".to_string(),
            duration: 212,
            thumbnail: None,
            description: String::new(),
            view_count: 1_500_000,
            upload_date: Some("20091025".to_string()),
        }
    }

    #[test]
    fn test_labels() {
        let info = info();
        assert_eq!(info.duration_label(), "03:32");
        assert_eq!(info.views_label(), "1,500,000");
        assert_eq!(info.upload_date_label().as_deref(), Some("2009-10-25"));
    }

    #[test]
    fn test_unparsable_upload_date_is_kept_raw() {
        let info = VideoInfo {
            upload_date: Some("sometime".to_string()),
            ..info()
        };
        assert_eq!(info.upload_date_label().as_deref(), Some("sometime"));
    }

    #[test]
    fn test_default_audio_extraction() {
        let audio = AudioExtraction::default();
        assert_eq!(audio.codec, "mp3");
        assert_eq!(audio.bitrate_kbps, "320");
    }
}
