use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use tubecore::config::bot_token;
use tubecore::core::init_logger;
use tubecore::download::YtDlpEngine;
use tubecore::{Downloader, RetentionManager, Settings};
use tubefetch::cli::{Cli, Commands};
use tubefetch::telegram::{create_bot, run_sweep, schema, setup_bot_commands, spawn_sweeper, HandlerDeps, SessionStore};

/// Parses CLI arguments, loads settings and dispatches to the subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    let settings = Arc::new(Settings::load()?);
    init_logger(&settings.log_file)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot(settings).await,
        Some(Commands::Sweep) => run_cli_sweep(settings).await,
        Some(Commands::Files) => run_cli_files(settings),
        Some(Commands::Info { url }) => run_cli_info(settings, url).await,
    }
}

fn build_downloader(settings: &Arc<Settings>) -> (Arc<RetentionManager>, Arc<Downloader>) {
    let retention = Arc::new(RetentionManager::from_settings(Arc::clone(settings)));
    let engine = Arc::new(YtDlpEngine::from_settings(settings));
    let downloader = Arc::new(Downloader::new(Arc::clone(settings), engine, Arc::clone(&retention)));
    (retention, downloader)
}

async fn run_bot(settings: Arc<Settings>) -> Result<()> {
    let Some(token) = bot_token() else {
        log::error!("BOT_TOKEN is not set. Put your bot token in the environment or a .env file.");
        anyhow::bail!("missing bot token");
    };

    log::info!("Starting TubeFetch v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Staging: {} | auto-delete: {} | keep: {}h | timeout: {}s",
        settings.staging_dir().display(),
        settings.auto_delete_files,
        settings.keep_files_hours,
        settings.download_timeout_secs
    );

    let (retention, downloader) = build_downloader(&settings);
    retention.staging().ensure_dir()?;

    let sessions = Arc::new(SessionStore::new());
    let sweeper = spawn_sweeper(Arc::clone(&retention), Arc::clone(&sessions), settings.sweep_interval());

    let bot = create_bot(&token);
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to publish bot commands: {}", e);
    }

    let deps = HandlerDeps::new(settings, downloader, retention, sessions);
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("Bot is running. Press Ctrl+C to stop.");
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    sweeper.abort();
    log::info!("Bot stopped");
    Ok(())
}

async fn run_cli_sweep(settings: Arc<Settings>) -> Result<()> {
    let (retention, _) = build_downloader(&settings);
    let report = run_sweep(retention).await;

    if report.skipped {
        println!("Auto-delete is on, nothing to sweep.");
        return Ok(());
    }
    println!("Scanned {} files, removed {}.", report.scanned, report.removed.len());
    for path in &report.removed {
        println!("  removed {}", path.display());
    }
    for (path, reason) in &report.failures {
        println!("  failed  {}: {}", path.display(), reason);
    }
    if !report.is_clean() {
        anyhow::bail!("{} files could not be removed", report.failures.len());
    }
    Ok(())
}

fn run_cli_files(settings: Arc<Settings>) -> Result<()> {
    let retention = RetentionManager::from_settings(settings);
    let inventory = retention.inventory()?;

    for file in &inventory.files {
        println!(
            "{:>10}  {}  {}",
            file.size_formatted,
            file.modified.format("%Y-%m-%d %H:%M"),
            file.name
        );
    }
    println!(
        "{} files, {} total",
        inventory.files.len(),
        inventory.total_size_formatted()
    );
    Ok(())
}

async fn run_cli_info(settings: Arc<Settings>, url: String) -> Result<()> {
    let (_, downloader) = build_downloader(&settings);
    let info = downloader.video_info(&url).await?;

    println!("Title:    {}", info.title);
    println!("Channel:  {}", info.channel);
    println!("Duration: {}", info.duration_label());
    println!("Views:    {}", info.views_label());
    if let Some(date) = info.upload_date_label() {
        println!("Uploaded: {}", date);
    }
    if let Some(thumbnail) = &info.thumbnail {
        println!("Thumb:    {}", thumbnail);
    }
    Ok(())
}
