//! Download management: variant selection, media engine, orchestration

pub mod engine;
pub mod orchestrator;
pub mod outcome;
pub mod request;
pub mod variant;
pub mod ytdlp;

pub use engine::{AudioExtraction, EngineError, FetchOptions, MediaEngine, VideoInfo};
pub use orchestrator::Downloader;
pub use outcome::{DownloadFailure, DownloadOutcome};
pub use request::{DownloadRequest, RequestToken};
pub use variant::{MediaKind, Variant, VideoQuality};
pub use ytdlp::YtDlpEngine;
