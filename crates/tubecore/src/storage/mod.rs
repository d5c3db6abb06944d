//! Staging directory, staging registry and retention policy

pub mod registry;
pub mod retention;
pub mod staging;

pub use registry::{StagedFile, StagingRegistry};
pub use retention::{Inventory, Release, RetentionManager, StoredFileInfo, SweepReport};
pub use staging::{StagedEntry, StagingArea};
