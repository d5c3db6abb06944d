use thiserror::Error;

use crate::storage::registry::StagedFile;

/// Why a download produced nothing deliverable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadFailure {
    /// The engine raised (network, unavailable format, restricted content...)
    #[error("engine failure: {0}")]
    Engine(String),

    /// Engine reported success but no artifact carries the expected prefix
    #[error("no artifact matching '{prefix}' in staging directory")]
    NotFound { prefix: String },

    /// Staging directory could not be created or read
    #[error("staging directory error: {0}")]
    Staging(String),

    /// Background worker panicked
    #[error("download worker failed: {0}")]
    Worker(String),
}

/// Classified result of one download. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Artifact staged and within its ceiling
    Success(StagedFile),
    /// Artifact exceeded the ceiling and has already been deleted
    TooLarge { size: u64, limit: u64 },
    /// Engine exceeded the time budget; the request was abandoned
    TimedOut,
    /// Nothing deliverable was produced; the reason is kept for logs
    Failed(DownloadFailure),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success(_))
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        match self {
            DownloadOutcome::Success(file) => Some(file),
            _ => None,
        }
    }

    /// Short tag for logs
    pub fn label(&self) -> &'static str {
        match self {
            DownloadOutcome::Success(_) => "success",
            DownloadOutcome::TooLarge { .. } => "too_large",
            DownloadOutcome::TimedOut => "timed_out",
            DownloadOutcome::Failed(DownloadFailure::NotFound { .. }) => "not_found",
            DownloadOutcome::Failed(_) => "failed",
        }
    }
}
