//! Mock implementations for orchestrator tests
//!
//! Scripted media engine that writes files through the same output template
//! the real backend receives, without any network access.

pub mod mock_engine;

#[allow(unused_imports)]
pub use mock_engine::{Behavior, MockEngine};
