//! Telegram bot handler tree configuration
//!
//! The schema is built from `HandlerDeps` only, so tests and production
//! share the same handler tree.

mod callbacks;
mod commands;
mod messages;
mod schema;
mod types;

pub use schema::schema;
pub use types::{sender_id, sender_username, HandlerDeps, HandlerError};
