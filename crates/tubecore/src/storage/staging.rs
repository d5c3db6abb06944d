//! Flat on-disk staging area.
//!
//! No subdirectories and no index file: the directory listing is the source
//! of truth for what exists on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::error::AppResult;
use crate::download::engine::{EXT_FIELD, TITLE_FIELD};

/// Suffixes yt-dlp uses for in-progress fragments
const PARTIAL_SUFFIXES: [&str; 3] = [".part", ".ytdl", ".temp"];

/// A regular file found in the staging directory
#[derive(Debug, Clone)]
pub struct StagedEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
}

#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if absent. Safe to call any number of times.
    pub fn ensure_dir(&self) -> AppResult<()> {
        fs_err::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Engine output template for a filename prefix
    pub fn output_template(&self, prefix: &str) -> PathBuf {
        self.dir.join(format!("{}{}.{}", prefix, TITLE_FIELD, EXT_FIELD))
    }

    /// All regular files, sorted by name. A missing directory lists as empty.
    pub fn list_files(&self) -> AppResult<Vec<StagedEntry>> {
        let read_dir = match fs_err::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let path = entry.path();
            let metadata = match fs_err::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    // Raced with a delete, or unreadable: skip, it is not ours to report
                    log::warn!("Skipping staged entry: {}", e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            entries.push(StagedEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: metadata.modified()?,
                path,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Every file whose name starts with `prefix`, partial fragments included
    pub fn files_with_prefix(&self, prefix: &str) -> AppResult<Vec<PathBuf>> {
        Ok(self
            .list_files()?
            .into_iter()
            .filter(|entry| entry.name.starts_with(prefix))
            .map(|entry| entry.path)
            .collect())
    }

    /// The finished artifact for `prefix`, optionally required to carry `extension`.
    pub fn find_artifact(&self, prefix: &str, extension: Option<&str>) -> AppResult<Option<PathBuf>> {
        let wanted_suffix = extension.map(|ext| format!(".{}", ext));
        Ok(self
            .list_files()?
            .into_iter()
            .filter(|entry| entry.name.starts_with(prefix))
            .filter(|entry| !PARTIAL_SUFFIXES.iter().any(|suffix| entry.name.ends_with(suffix)))
            .find(|entry| wanted_suffix.as_deref().map_or(true, |suffix| entry.name.ends_with(suffix)))
            .map(|entry| entry.path))
    }
}
