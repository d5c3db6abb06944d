//! Logging initialization
//!
//! Terminal output plus a plain log file, both through the `log` facade.

use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use crate::core::error::{AppError, AppResult};

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file (appended to, created if absent)
pub fn init_logger(log_file_path: &str) -> AppResult<()> {
    let log_file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| AppError::Logger(e.to_string()))?;

    Ok(())
}

/// Audit line for every download attempt, grep-able by the `DOWNLOAD_LOG` tag
pub fn log_download(user_id: i64, username: Option<&str>, url: &str, download_type: &str, success: bool) {
    log::info!(
        "DOWNLOAD_LOG: User: {} (@{}) | Type: {} | URL: {} | Success: {}",
        user_id,
        username.unwrap_or("N/A"),
        download_type,
        url,
        success
    );
}
