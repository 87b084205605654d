use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::playlist::{Dialect, PlaylistEntry};

/// Immutable view of a loaded playlist
#[derive(Debug, Clone, Default)]
pub struct PlaylistSnapshot {
    pub entries: Vec<PlaylistEntry>,
    pub dialect: Option<Dialect>,
    /// `None` until a load succeeded
    pub loaded_at: Option<DateTime<Utc>>,
}

impl PlaylistSnapshot {
    #[must_use]
    pub fn loaded(entries: Vec<PlaylistEntry>, dialect: Dialect) -> Self {
        Self {
            entries,
            dialect: Some(dialect),
            loaded_at: Some(Utc::now()),
        }
    }

    /// Plain offset pagination, `page` is 1-based. Out of range pages are empty.
    #[must_use]
    pub fn page(&self, page: usize, size: usize) -> &[PlaylistEntry] {
        let start = page.saturating_sub(1).saturating_mul(size);
        let end = start.saturating_add(size).min(self.entries.len());
        self.entries.get(start..end).unwrap_or_default()
    }
}

/// Process-wide playlist holder.
///
/// Readers get an [`Arc`] to the snapshot that was current when they asked,
/// writers swap in a whole new snapshot. Nobody ever sees a half-replaced list.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    tx: Arc<watch::Sender<Arc<PlaylistSnapshot>>>,
}

impl Default for PlaylistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(PlaylistSnapshot::default()));
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<PlaylistSnapshot> {
        self.tx.borrow().clone()
    }

    /// Swaps in `snapshot`, returning the one it replaced
    pub fn replace(&self, snapshot: PlaylistSnapshot) -> Arc<PlaylistSnapshot> {
        self.tx.send_replace(Arc::new(snapshot))
    }

    pub fn clear(&self) {
        self.replace(PlaylistSnapshot::default());
    }
}
