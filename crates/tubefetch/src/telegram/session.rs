//! Per-chat state kept in memory: chosen mode and links awaiting a quality pick.
//!
//! Callback data is limited to 64 bytes, so keyboards carry a short numeric
//! key and the link itself stays here.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// How long a link stays selectable after its preview was shown
pub const PENDING_LINK_TTL: Duration = Duration::from_secs(3600);

/// A chat's mode is forgotten after this long without use
pub const MODE_IDLE_TTL: Duration = Duration::from_secs(24 * 3600);

/// What a bare link in this chat should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Show the quality keyboard
    #[default]
    Video,
    /// Start an MP3 download straight away
    Audio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    pub url: String,
    pub title: Option<String>,
    pub created_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct ChatMode {
    mode: Mode,
    last_used: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    modes: DashMap<i64, ChatMode>,
    pending: DashMap<u64, PendingLink>,
    next_key: AtomicU64,
    link_ttl: Duration,
    mode_idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttls(PENDING_LINK_TTL, MODE_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttls(link_ttl: Duration, mode_idle_ttl: Duration) -> Self {
        Self {
            modes: DashMap::new(),
            pending: DashMap::new(),
            next_key: AtomicU64::new(0),
            link_ttl,
            mode_idle_ttl,
        }
    }

    pub fn set_mode(&self, chat_id: i64, mode: Mode) {
        self.modes.insert(
            chat_id,
            ChatMode {
                mode,
                last_used: Instant::now(),
            },
        );
    }

    /// Mode for a chat; reading it counts as use.
    pub fn mode(&self, chat_id: i64) -> Mode {
        match self.modes.get_mut(&chat_id) {
            Some(mut entry) => {
                entry.last_used = Instant::now();
                entry.mode
            }
            None => Mode::default(),
        }
    }

    /// Stores a link and returns the key to put in callback data.
    pub fn remember_link(&self, url: &str, title: Option<String>) -> u64 {
        self.prune_expired(self.link_ttl);
        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        self.pending.insert(
            key,
            PendingLink {
                url: url.to_string(),
                title,
                created_at: Instant::now(),
            },
        );
        key
    }

    /// Link for a key. Kept after lookup so the user can retry with another quality.
    pub fn link(&self, key: u64) -> Option<PendingLink> {
        self.pending.get(&key).map(|link| link.value().clone())
    }

    pub fn prune_expired(&self, max_age: Duration) {
        self.pending.retain(|_, link| link.created_at.elapsed() < max_age);
    }

    pub fn prune_idle_modes(&self, max_idle: Duration) {
        self.modes.retain(|_, entry| entry.last_used.elapsed() < max_idle);
    }

    /// Drops expired links and idle chat modes
    pub fn prune(&self) {
        self.prune_expired(self.link_ttl);
        self.prune_idle_modes(self.mode_idle_ttl);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults_to_video() {
        let store = SessionStore::new();
        assert_eq!(store.mode(1), Mode::Video);
        store.set_mode(1, Mode::Audio);
        assert_eq!(store.mode(1), Mode::Audio);
        assert_eq!(store.mode(2), Mode::Video);
    }

    #[test]
    fn test_links_get_distinct_keys_and_survive_lookup() {
        let store = SessionStore::new();
        let a = store.remember_link("https://youtu.be/a", Some("A".to_string()));
        let b = store.remember_link("https://youtu.be/b", None);
        assert_ne!(a, b);

        assert_eq!(store.link(a).unwrap().url, "https://youtu.be/a");
        assert_eq!(store.link(a).unwrap().title.as_deref(), Some("A"));
        assert!(store.link(b + 100).is_none());
    }

    #[test]
    fn test_prune_expired() {
        let store = SessionStore::new();
        store.remember_link("https://youtu.be/a", None);
        assert_eq!(store.pending_count(), 1);

        store.prune_expired(Duration::ZERO);
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_idle_modes_are_pruned() {
        let store = SessionStore::new();
        store.set_mode(1, Mode::Audio);
        store.set_mode(2, Mode::Video);

        store.prune();
        assert_eq!(store.mode_count(), 2);

        store.prune_idle_modes(Duration::ZERO);
        assert_eq!(store.mode_count(), 0);
        assert_eq!(store.mode(1), Mode::Video);
    }
}
