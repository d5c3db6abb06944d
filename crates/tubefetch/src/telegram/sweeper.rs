//! Periodic retention sweep

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tubecore::{RetentionManager, SweepReport};

use crate::telegram::session::SessionStore;

/// One sweep on the blocking pool. A panicking sweep yields an empty report.
pub async fn run_sweep(retention: Arc<RetentionManager>) -> SweepReport {
    match tokio::task::spawn_blocking(move || retention.sweep()).await {
        Ok(report) => report,
        Err(e) => {
            log::error!("Sweep task failed: {}", e);
            SweepReport::default()
        }
    }
}

/// Sweeps now and then every `period` until the runtime shuts down.
/// Each tick also prunes stale chat sessions.
pub fn spawn_sweeper(retention: Arc<RetentionManager>, sessions: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            // First tick completes immediately: that is the startup sweep
            ticker.tick().await;
            let report = run_sweep(Arc::clone(&retention)).await;
            if !report.is_clean() {
                log::warn!("Sweep left {} files behind", report.failures.len());
            }
            sessions.prune();
        }
    })
}
