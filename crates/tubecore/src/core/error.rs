use thiserror::Error;

use crate::core::validation::ValidationError;
use crate::download::engine::EngineError;

/// Centralized error type for the core library
///
/// Used for operations that return a `Result` (configuration, logging, staging
/// IO). The download workflow itself never surfaces these to callers: the
/// orchestrator folds every failure into a [`crate::DownloadOutcome`].
#[derive(Error, Debug)]
pub enum AppError {
    /// IO errors (fs-err already names the path involved)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be extracted from file/env
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Logger setup failed
    #[error("Logger error: {0}")]
    Logger(String),

    /// Media engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Background worker did not finish (panicked or was cancelled)
    #[error("Worker error: {0}")]
    Worker(String),

    /// Operation exceeded its time budget
    #[error("Operation timed out after {0}s")]
    Timeout(u64),
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(Box::new(err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Worker(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AppError::Timeout(300);
        assert_eq!(err.to_string(), "Operation timed out after 300s");

        let err: AppError = ValidationError::InvalidUrl("https://vimeo.com/1".into()).into();
        assert!(err.to_string().starts_with("Validation error:"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
