use std::collections::HashSet;

use jiff::Timestamp;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::StorageError,
    models::{ContentKind, WatchlistEntry},
    storage::SlotStorage,
};

pub const WATCHLIST_SLOT: &str = "watchlist";

/// Result of a mutating call. `persisted` reports whether the full entry set
/// reached storage; the in-memory state is kept either way.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    pub persisted: bool,
}

/// The user's saved titles, written through to a storage slot on every mutation.
#[derive(Debug)]
pub struct WatchlistStore<S> {
    storage: S,
    entries: Vec<WatchlistEntry>,
}

impl<S: SlotStorage> WatchlistStore<S> {
    pub async fn load(storage: S) -> Self {
        let entries = load_entries(&storage).await;
        debug!(entries = entries.len(), "watchlist loaded");
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn get(&self, id: i64) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every call rewrites the slot, so a retry after a failed write repairs it.
    pub async fn add(&mut self, id: i64, kind: ContentKind) -> Outcome {
        let changed = !self.contains(id);
        if changed {
            self.entries.push(WatchlistEntry { id, kind, added_at: Timestamp::now() });
            debug!(id, kind = %kind, "added to watchlist");
        }
        self.persist(changed).await
    }

    pub async fn remove(&mut self, id: i64) -> Outcome {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let changed = self.entries.len() != before;
        if changed {
            debug!(id, "removed from watchlist");
        }
        self.persist(changed).await
    }

    pub async fn clear(&mut self) -> Outcome {
        let changed = !self.is_empty();
        if changed {
            debug!(removed = self.entries.len(), "watchlist cleared");
            self.entries.clear();
        }
        self.persist(changed).await
    }

    async fn persist(&self, changed: bool) -> Outcome {
        let result = match serde_json::to_string(&self.entries) {
            Ok(raw) => self.storage.write(WATCHLIST_SLOT, &raw).await,
            Err(err) => Err(StorageError::from(err)),
        };

        match result {
            Ok(()) => Outcome { changed, persisted: true },
            Err(err) => {
                warn!(error = %err, "failed to persist watchlist, keeping in-memory state");
                Outcome { changed, persisted: false }
            },
        }
    }
}

/// Reads the persisted watchlist. Absent, unreadable or malformed contents
/// all yield an empty list.
pub async fn load_entries<S: SlotStorage>(storage: &S) -> Vec<WatchlistEntry> {
    match read_entries(storage).await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable watchlist");
            Vec::new()
        },
    }
}

async fn read_entries<S: SlotStorage>(storage: &S) -> Result<Vec<WatchlistEntry>, StorageError> {
    let Some(raw) = storage.read(WATCHLIST_SLOT).await? else {
        return Ok(Vec::new());
    };

    let mut entries: Vec<WatchlistEntry> = serde_json::from_str(&raw)?;
    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(e.id));
    Ok(entries)
}
