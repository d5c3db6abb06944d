use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::AppResult;
use crate::download::Variant;

/// Optional settings file, looked up in the working directory
pub const SETTINGS_FILE: &str = "tubefetch.toml";

/// Prefix for environment overrides (`TUBEFETCH_STAGING_DIR`, ...)
pub const ENV_PREFIX: &str = "TUBEFETCH_";

/// Value shipped in sample env files; treated the same as a missing token
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

const MIB: u64 = 1024 * 1024;

/// Engine format selectors and the fixed audio transcode target
pub mod formats {
    /// Selector used when the requested quality label is not in the table
    pub const FALLBACK_SELECTOR: &str = "best";

    /// Selector for audio downloads (best audio stream, any container as fallback)
    pub const AUDIO_SELECTOR: &str = "bestaudio/best";

    /// Codec every audio download is transcoded to
    pub const AUDIO_FORMAT: &str = "mp3";

    /// Audio bitrate in kbps
    pub const AUDIO_QUALITY: &str = "320";
}

/// Runtime settings for the bot.
///
/// Loaded once at startup and passed around as `Arc<Settings>`. Nothing in the
/// crate reads these values from the environment after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Flat directory holding produced artifacts. Supports `~` expansion.
    pub staging_dir: String,
    /// Ceiling for audio and every video quality except 4K (bytes)
    pub max_file_size: u64,
    /// Ceiling for the 4K quality (bytes)
    pub max_file_size_4k: u64,
    /// Wall-clock budget for one engine invocation
    pub download_timeout_secs: u64,
    /// Delete every staged file right after it has been handled
    pub auto_delete_files: bool,
    /// Age after which the sweep removes staged files (ignored with auto-delete)
    pub keep_files_hours: u64,
    /// Interval between periodic sweeps
    pub sweep_interval_secs: u64,
    /// yt-dlp binary name or path
    pub ytdl_bin: String,
    /// Log file written next to terminal output
    pub log_file: String,
    /// Telegram user ids allowed to run /files and /cleanup
    pub admin_ids: Vec<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            staging_dir: "downloads".to_string(),
            max_file_size: 80 * MIB,
            max_file_size_4k: 200 * MIB,
            download_timeout_secs: 300,
            auto_delete_files: false,
            keep_files_hours: 24,
            sweep_interval_secs: 3600,
            ytdl_bin: "yt-dlp".to_string(),
            log_file: "bot.log".to_string(),
            admin_ids: Vec::new(),
        }
    }
}

impl Settings {
    /// Layered provider: defaults, then `tubefetch.toml`, then `TUBEFETCH_*` env vars.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(SETTINGS_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads settings from every configured source.
    pub fn load() -> AppResult<Self> {
        Ok(Self::figment().extract()?)
    }

    /// Staging directory with `~` expanded
    pub fn staging_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.staging_dir).into_owned())
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn retention_window(&self) -> Duration {
        Duration::from_secs(self.keep_files_hours * 3600)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Maximum artifact size for the given variant.
    ///
    /// Only the 4K video quality gets the elevated ceiling; audio and every
    /// other quality share the default one.
    pub fn ceiling_for(&self, variant: &Variant) -> u64 {
        if variant.is_4k() {
            self.max_file_size_4k
        } else {
            self.max_file_size
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

/// Bot credential from BOT_TOKEN or TELOXIDE_TOKEN.
///
/// Returns `None` when unset, empty or still the sample placeholder.
pub fn bot_token() -> Option<SecretString> {
    let raw = env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default();
    parse_token(&raw)
}

fn parse_token(raw: &str) -> Option<SecretString> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_TOKEN {
        None
    } else {
        Some(SecretString::from(trimmed.to_string()))
    }
}
