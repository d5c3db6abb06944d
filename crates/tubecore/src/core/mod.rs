//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Settings;
pub use error::{AppError, AppResult};
pub use logging::init_logger;
pub use utils::{format_duration, format_file_size};
pub use validation::{is_valid_youtube_url, validate_youtube_url, ValidationError};
