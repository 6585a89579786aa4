//! Listing cache
//!
//! Keeps the most recent listing per folder for a staleness window and lets mutations
//! invalidate the folders they touched. A cache is always handed to a session
//! explicitly; two sessions only share listings when given the same `Arc<ListingCache>`.

use crate::api::model::FolderContents;
use crate::types::QueryKey;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry {
    contents: FolderContents,
    fetched_at: Instant,
}

pub struct ListingCache {
    stale_after: Duration,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl ListingCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Fresh listing for `key`, if any. Stale entries are evicted on lookup.
    pub fn get(&self, key: QueryKey) -> Option<FolderContents> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: QueryKey, now: Instant) -> Option<FolderContents> {
        let mut entries = self.entries.lock();
        let fresh = match entries.get(&key) {
            Some(entry) => now.saturating_duration_since(entry.fetched_at) < self.stale_after,
            None => return None,
        };
        if fresh {
            debug!(key = ?key, "Listing cache hit");
            entries.get(&key).map(|e| e.contents.clone())
        } else {
            debug!(key = ?key, "Listing cache entry stale");
            entries.remove(&key);
            None
        }
    }

    pub fn insert(&self, key: QueryKey, contents: FolderContents) {
        self.insert_at(key, contents, Instant::now());
    }

    fn insert_at(&self, key: QueryKey, contents: FolderContents, fetched_at: Instant) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                contents,
                fetched_at,
            },
        );
    }

    /// Drop the listing for `key` so the next read refetches it.
    pub fn invalidate(&self, key: QueryKey) -> bool {
        let removed = self.entries.lock().remove(&key).is_some();
        debug!(key = ?key, removed, "Listing cache invalidate");
        removed
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
