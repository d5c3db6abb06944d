//! TubeFetch - Telegram bot for downloading YouTube videos and MP3 audio
//!
//! # Module Structure
//!
//! - `cli`: command line interface
//! - `telegram`: dispatcher schema, handlers, keyboards and user-facing texts
//!
//! Download, staging and retention logic lives in `tubecore`.

pub mod cli;
pub mod telegram;

pub use telegram::{create_bot, schema, HandlerDeps};
