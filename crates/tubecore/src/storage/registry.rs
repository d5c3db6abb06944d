use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::path::{Path, PathBuf};

use crate::download::request::RequestToken;
use crate::download::variant::MediaKind;

/// A delivered-or-pending artifact in the staging directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub token: RequestToken,
    pub user_id: i64,
    pub kind: MediaKind,
    pub path: PathBuf,
    pub size: u64,
    pub staged_at: DateTime<Utc>,
}

impl StagedFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// In-memory map from request token to staged artifact.
///
/// Shared by the orchestrator (inserts on success) and the retention manager
/// (removes on delete). Files left over from a previous process are not in
/// here; the sweep handles those from the directory listing.
#[derive(Debug, Default)]
pub struct StagingRegistry {
    files: DashMap<RequestToken, StagedFile>,
}

impl StagingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, file: StagedFile) {
        self.files.insert(file.token, file);
    }

    pub fn get(&self, token: &RequestToken) -> Option<StagedFile> {
        self.files.get(token).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, token: &RequestToken) -> Option<StagedFile> {
        self.files.remove(token).map(|(_, file)| file)
    }

    /// Drops the entry pointing at `path`, if any
    pub fn remove_path(&self, path: &Path) -> Option<StagedFile> {
        let token = self
            .files
            .iter()
            .find(|entry| entry.value().path == path)
            .map(|entry| *entry.key())?;
        self.remove(&token)
    }

    /// Snapshot of all entries for one user
    pub fn for_user(&self, user_id: i64) -> Vec<StagedFile> {
        self.files
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(user_id: i64, path: &str) -> StagedFile {
        StagedFile {
            token: RequestToken::new(),
            user_id,
            kind: MediaKind::Audio,
            path: PathBuf::from(path),
            size: 10,
            staged_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_get_remove() {
        let registry = StagingRegistry::new();
        let file = staged(42, "downloads/audio_42_a_Song.mp3");
        registry.insert(file.clone());

        assert_eq!(registry.get(&file.token), Some(file.clone()));
        assert_eq!(registry.remove(&file.token), Some(file));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_by_path() {
        let registry = StagingRegistry::new();
        let a = staged(1, "downloads/a.mp3");
        let b = staged(2, "downloads/b.mp3");
        registry.insert(a);
        registry.insert(b.clone());

        let removed = registry.remove_path(Path::new("downloads/a.mp3")).unwrap();
        assert_eq!(removed.user_id, 1);
        assert!(registry.remove_path(Path::new("downloads/missing.mp3")).is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.for_user(2), vec![b]);
        assert!(registry.for_user(1).is_empty());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(staged(1, "downloads/audio_1_t_Song.mp3").file_name(), "audio_1_t_Song.mp3");
    }
}
