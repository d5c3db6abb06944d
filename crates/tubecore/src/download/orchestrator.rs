//! Download orchestration.
//!
//! Runs the blocking engine on tokio's blocking pool under a wall-clock
//! budget, locates the produced artifact by its request prefix, enforces the
//! size ceiling and classifies the result. Nothing in here returns an error to
//! the caller: every failure becomes a [`DownloadOutcome`].

use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::config::Settings;
use crate::core::error::{AppError, AppResult};
use crate::core::validation::validate_youtube_url;
use crate::download::engine::{AudioExtraction, EngineError, FetchOptions, MediaEngine, VideoInfo};
use crate::download::outcome::{DownloadFailure, DownloadOutcome};
use crate::download::request::DownloadRequest;
use crate::download::variant::Variant;
use crate::storage::registry::StagedFile;
use crate::storage::retention::RetentionManager;

pub struct Downloader {
    settings: Arc<Settings>,
    engine: Arc<dyn MediaEngine>,
    retention: Arc<RetentionManager>,
}

impl Downloader {
    pub fn new(settings: Arc<Settings>, engine: Arc<dyn MediaEngine>, retention: Arc<RetentionManager>) -> Self {
        Self {
            settings,
            engine,
            retention,
        }
    }

    pub fn retention(&self) -> &Arc<RetentionManager> {
        &self.retention
    }

    /// Engine options for a request: selector, per-request output template, audio transcode
    pub fn fetch_options(&self, request: &DownloadRequest) -> FetchOptions {
        let variant = request.variant();
        FetchOptions {
            format: variant.format_selector().to_string(),
            output_template: self.retention.staging().output_template(&request.file_prefix()),
            audio: matches!(variant, Variant::Audio).then(AudioExtraction::default),
            suppress_sidecars: true,
        }
    }

    /// Metadata for a link, under the same time budget as downloads.
    pub async fn video_info(&self, url: &str) -> AppResult<VideoInfo> {
        validate_youtube_url(url)?;

        let engine = Arc::clone(&self.engine);
        let url = url.to_string();
        let budget = self.settings.download_timeout();
        let worker = tokio::task::spawn_blocking(move || engine.extract_info(&url));

        let info = tokio::time::timeout(budget, worker)
            .await
            .map_err(|_| AppError::Timeout(budget.as_secs()))???;
        Ok(info)
    }

    /// Downloads one request and classifies the result.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadOutcome {
        let staging = self.retention.staging();
        if let Err(e) = staging.ensure_dir() {
            log::error!("Cannot prepare staging directory {}: {}", staging.dir().display(), e);
            return DownloadOutcome::Failed(DownloadFailure::Staging(e.to_string()));
        }

        let prefix = request.file_prefix();
        let options = self.fetch_options(request);
        let engine = Arc::clone(&self.engine);
        let url = request.url().to_string();
        let budget = self.settings.download_timeout();

        log::info!(
            "Starting {} download via {} for user {}: {} (format: {})",
            request.variant(),
            self.engine.name(),
            request.user_id(),
            request.url(),
            options.format
        );

        let mut worker = tokio::task::spawn_blocking(move || engine.fetch(&url, &options));

        match tokio::time::timeout(budget, &mut worker).await {
            Err(_) => {
                log::error!("Download timeout after {}s: {}", budget.as_secs(), request.url());
                discard_partial(&self.retention, &prefix);
                self.discard_when_finished(worker, prefix);
                DownloadOutcome::TimedOut
            }
            Ok(Err(join_error)) => {
                log::error!("Download worker failed for {}: {}", request.url(), join_error);
                DownloadOutcome::Failed(DownloadFailure::Worker(join_error.to_string()))
            }
            Ok(Ok(Err(engine_error))) => {
                log::error!("Error downloading {} {}: {}", request.variant(), request.url(), engine_error);
                DownloadOutcome::Failed(DownloadFailure::Engine(engine_error.to_string()))
            }
            Ok(Ok(Ok(()))) => self.classify(request, &prefix),
        }
    }

    /// Locates the artifact and applies the size ceiling.
    fn classify(&self, request: &DownloadRequest, prefix: &str) -> DownloadOutcome {
        let variant = request.variant();
        let path = match self.retention.staging().find_artifact(prefix, variant.expected_extension()) {
            Ok(Some(path)) => path,
            Ok(None) => {
                log::error!("Engine reported success but no file matches '{}'", prefix);
                return DownloadOutcome::Failed(DownloadFailure::NotFound {
                    prefix: prefix.to_string(),
                });
            }
            Err(e) => return DownloadOutcome::Failed(DownloadFailure::Staging(e.to_string())),
        };

        let size = match fs_err::metadata(&path) {
            Ok(metadata) => metadata.len(),
            Err(e) => return DownloadOutcome::Failed(DownloadFailure::Staging(e.to_string())),
        };

        let limit = self.settings.ceiling_for(variant);
        if size > limit {
            log::warn!("File too large: {} ({} > {} bytes)", path.display(), size, limit);
            if let Err(e) = self.retention.release(&path, true) {
                log::error!("Failed to discard oversized file {}: {}", path.display(), e);
            }
            return DownloadOutcome::TooLarge { size, limit };
        }

        let staged = StagedFile {
            token: request.token(),
            user_id: request.user_id(),
            kind: variant.kind(),
            path,
            size,
            staged_at: Utc::now(),
        };
        self.retention.registry().insert(staged.clone());
        log::info!("{} downloaded successfully: {}", variant.kind(), staged.path.display());
        DownloadOutcome::Success(staged)
    }

    /// Purges the abandoned request again once its worker returns.
    ///
    /// The worker cannot be cancelled, so anything it writes after the
    /// timeout is removed here regardless of the retention policy.
    fn discard_when_finished(&self, worker: JoinHandle<Result<(), EngineError>>, prefix: String) {
        let retention = Arc::clone(&self.retention);
        tokio::spawn(async move {
            if let Err(e) = worker.await {
                log::warn!("Abandoned download worker for '{}' failed: {}", prefix, e);
            }
            discard_partial(&retention, &prefix);
        });
    }
}

/// Best-effort removal of files left by an abandoned request
fn discard_partial(retention: &RetentionManager, prefix: &str) {
    let leftovers = match retention.staging().files_with_prefix(prefix) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("Could not scan for partial files of '{}': {}", prefix, e);
            return;
        }
    };
    for path in leftovers {
        if let Err(e) = retention.release(&path, true) {
            log::warn!("Partial file {} left for the sweep: {}", path.display(), e);
        }
    }
}
