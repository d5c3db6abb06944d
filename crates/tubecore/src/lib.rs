//! TubeFetch core - everything the bot needs except Telegram itself
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, URL validation and formatting helpers
//! - `download`: media engine capability, yt-dlp backend and the download orchestrator
//! - `storage`: staging directory, staging registry and retention policy

pub mod core;
pub mod download;
pub mod storage;

// Re-export commonly used types for convenience
pub use self::core::{config, AppError, AppResult, Settings};
pub use download::{DownloadFailure, DownloadOutcome, DownloadRequest, Downloader, Variant, VideoQuality};
pub use storage::{Inventory, Release, RetentionManager, StagedFile, StagingArea, StagingRegistry, SweepReport};
