//! Retention policy for staged files.
//!
//! Policy is global: with auto-delete on, every file goes right after it has
//! been handled and the sweep has nothing to do. With auto-delete off, files
//! stay until the sweep finds them older than the retention window.

use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::config::Settings;
use crate::core::error::AppResult;
use crate::core::utils::format_file_size;
use crate::storage::registry::StagingRegistry;
use crate::storage::staging::StagingArea;

/// What `release` did with the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Deleted,
    /// Left for the age-based sweep
    Kept,
    /// Nothing at that path
    Missing,
}

/// Result of one sweep pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Auto-delete is on, nothing was scanned
    pub skipped: bool,
    pub scanned: usize,
    pub removed: Vec<PathBuf>,
    /// Files that were due but could not be removed, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl SweepReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFileInfo {
    pub name: String,
    pub size: u64,
    pub size_formatted: String,
    pub modified: DateTime<Local>,
}

/// Snapshot of the staging directory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub files: Vec<StoredFileInfo>,
    pub total_size: u64,
}

impl Inventory {
    pub fn total_size_formatted(&self) -> String {
        format_file_size(self.total_size)
    }
}

pub struct RetentionManager {
    settings: Arc<Settings>,
    staging: StagingArea,
    registry: Arc<StagingRegistry>,
}

impl RetentionManager {
    pub fn new(settings: Arc<Settings>, staging: StagingArea, registry: Arc<StagingRegistry>) -> Self {
        Self {
            settings,
            staging,
            registry,
        }
    }

    /// Staging area at `settings.staging_dir()` with a fresh registry
    pub fn from_settings(settings: Arc<Settings>) -> Self {
        let staging = StagingArea::new(settings.staging_dir());
        Self::new(settings, staging, Arc::new(StagingRegistry::new()))
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn registry(&self) -> &Arc<StagingRegistry> {
        &self.registry
    }

    /// Deletes `path` when auto-delete is on or `force` is set; keeps it otherwise.
    ///
    /// A missing file is not an error.
    pub fn release(&self, path: &Path, force: bool) -> AppResult<Release> {
        if !(self.settings.auto_delete_files || force) {
            if path.exists() {
                log::info!("File preserved (auto-delete off): {}", path.display());
                return Ok(Release::Kept);
            }
            self.registry.remove_path(path);
            return Ok(Release::Missing);
        }

        match fs_err::remove_file(path) {
            Ok(()) => {
                self.registry.remove_path(path);
                log::info!("Cleaned up file: {}", path.display());
                Ok(Release::Deleted)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.registry.remove_path(path);
                Ok(Release::Missing)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Removes every staged file older than the retention window.
    pub fn sweep(&self) -> SweepReport {
        self.sweep_at(SystemTime::now())
    }

    /// [`sweep`](Self::sweep) against an explicit clock.
    ///
    /// Best-effort: a file that cannot be removed is recorded in the report
    /// and the pass continues with the rest.
    pub fn sweep_at(&self, now: SystemTime) -> SweepReport {
        self.sweep_with(now, |path| fs_err::remove_file(path))
    }

    fn sweep_with<F>(&self, now: SystemTime, remove: F) -> SweepReport
    where
        F: Fn(&Path) -> std::io::Result<()>,
    {
        if self.settings.auto_delete_files {
            return SweepReport::skipped();
        }

        let cutoff = now.checked_sub(self.settings.retention_window()).unwrap_or(UNIX_EPOCH);
        let mut report = SweepReport::default();

        let entries = match self.staging.list_files() {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Error during scheduled cleanup: {}", e);
                report.failures.push((self.staging.dir().to_path_buf(), e.to_string()));
                return report;
            }
        };

        for entry in entries {
            report.scanned += 1;
            if entry.modified >= cutoff {
                continue;
            }
            match remove(&entry.path) {
                Ok(()) => {
                    self.registry.remove_path(&entry.path);
                    log::info!("Cleaned up old file: {}", entry.path.display());
                    report.removed.push(entry.path);
                }
                // Deleted by someone else between listing and now
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    log::warn!("Failed to remove old file: {}", e);
                    report.failures.push((entry.path, e.to_string()));
                }
            }
        }

        log::info!(
            "Sweep finished: scanned {}, removed {}, failed {}",
            report.scanned,
            report.removed.len(),
            report.failures.len()
        );
        report
    }

    /// Currently staged files with sizes and modification times. No side effects.
    pub fn inventory(&self) -> AppResult<Inventory> {
        let mut inventory = Inventory::default();
        for entry in self.staging.list_files()? {
            inventory.total_size += entry.size;
            inventory.files.push(StoredFileInfo {
                size_formatted: format_file_size(entry.size),
                modified: DateTime::<Local>::from(entry.modified),
                name: entry.name,
                size: entry.size,
            });
        }
        Ok(inventory)
    }
}
