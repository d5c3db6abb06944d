//! Telegram bot integration and handlers

pub mod bot;
pub mod delivery;
pub mod handlers;
pub mod keyboards;
pub mod messages;
pub mod session;
pub mod sweeper;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use session::{Mode, SessionStore};
pub use sweeper::{run_sweep, spawn_sweeper};
