//! Recent search history.
//!
//! [`SearchHistory`] keeps the most recent queries for one content type in a
//! [`HistoryStore`] under a configurable key, as a JSON array of
//! [`SearchHistoryItem`]s. Queries are deduplicated case-insensitively (the
//! latest submission wins) and the list is capped, dropping the oldest.
//!
//! Storage problems never reach the caller: they are logged and the history
//! reads as empty.
//!
//! [`SearchHistory::save_in_background`] hands writes to the rayon pool so a
//! slow store never delays a search. Background entries are written one at a
//! time in submission order.

pub mod store;

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::search::config::SearchConfig;

pub use store::{FileHistoryStore, HistoryStore, MemoryHistoryStore};

/// One submitted search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    /// The query as typed.
    pub query: String,
    /// Submission time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Number of results the query produced.
    pub result_count: usize,
}

/// History of recent queries backed by a [`HistoryStore`].
#[derive(Debug)]
pub struct SearchHistory {
    store: Arc<dyn HistoryStore>,
    key: String,
    max_items: usize,
    /// Serializes read-modify-write cycles.
    update_lock: Mutex<()>,
    pending: Mutex<PendingSaves>,
    /// Signalled when the background writer runs out of entries.
    idle: Condvar,
}

/// Entries queued for the background writer.
#[derive(Debug, Default)]
struct PendingSaves {
    queue: VecDeque<SearchHistoryItem>,
    /// Whether a writer task is scheduled; always true while `queue` is not
    /// empty.
    writing: bool,
}

impl SearchHistory {
    /// Create a history stored under `key`, keeping at most `max_items`.
    pub fn new<S: Into<String>>(store: Arc<dyn HistoryStore>, key: S, max_items: usize) -> Self {
        SearchHistory {
            store,
            key: key.into(),
            max_items: max_items.max(1),
            update_lock: Mutex::new(()),
            pending: Mutex::new(PendingSaves::default()),
            idle: Condvar::new(),
        }
    }

    /// Create a history using the key and capacity of a search config.
    pub fn from_config(store: Arc<dyn HistoryStore>, config: &SearchConfig) -> Self {
        Self::new(store, config.history_storage_key.clone(), config.max_history_items)
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The capacity.
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Record a submitted query. Blank queries are ignored.
    pub fn save(&self, query: &str, result_count: usize) {
        if let Some(entry) = Self::entry(query, result_count) {
            self.apply(entry);
        }
    }

    /// Record a submitted query without waiting for the store.
    ///
    /// The entry is stamped now and written later on the rayon pool. Use
    /// [`flush`](Self::flush) to wait for pending writes.
    pub fn save_in_background(self: &Arc<Self>, query: &str, result_count: usize) {
        let Some(entry) = Self::entry(query, result_count) else {
            return;
        };

        let mut pending = self.pending.lock();
        pending.queue.push_back(entry);
        if pending.writing {
            return;
        }
        pending.writing = true;
        drop(pending);

        let history = Arc::clone(self);
        rayon::spawn(move || history.drain());
    }

    /// Block until every background save has been written.
    pub fn flush(&self) {
        let mut pending = self.pending.lock();
        while pending.writing {
            self.idle.wait(&mut pending);
        }
    }

    fn entry(query: &str, result_count: usize) -> Option<SearchHistoryItem> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(SearchHistoryItem {
            query: query.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            result_count,
        })
    }

    fn apply(&self, entry: SearchHistoryItem) {
        let _guard = self.update_lock.lock();
        let mut items = self.read();
        let folded = entry.query.to_lowercase();
        items.retain(|item| item.query.to_lowercase() != folded);
        items.insert(0, entry);
        items.truncate(self.max_items);
        self.write(&items);
    }

    fn drain(&self) {
        let mut written = 0usize;
        loop {
            let entry = {
                let mut pending = self.pending.lock();
                match pending.queue.pop_front() {
                    Some(entry) => entry,
                    None => {
                        pending.writing = false;
                        self.idle.notify_all();
                        debug!("wrote {written} queued entries to search history '{}'", self.key);
                        return;
                    }
                }
            };
            self.apply(entry);
            written += 1;
        }
    }

    /// Up to `limit` entries, most recent first.
    pub fn load(&self, limit: usize) -> Vec<SearchHistoryItem> {
        let mut items = self.read();
        items.truncate(limit);
        items
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let _guard = self.update_lock.lock();
        if let Err(e) = self.store.delete(&self.key) {
            warn!("failed to clear search history '{}': {e}", self.key);
        }
    }

    /// Remove the entry matching `query`, ignoring case.
    pub fn remove(&self, query: &str) {
        let folded = query.trim().to_lowercase();
        let _guard = self.update_lock.lock();
        let mut items = self.read();
        let before = items.len();
        items.retain(|item| item.query.to_lowercase() != folded);
        if items.len() != before {
            self.write(&items);
        }
    }

    /// Past queries starting with `prefix` (ignoring case), most recent
    /// first.
    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<SearchHistoryItem> {
        let prefix = prefix.trim().to_lowercase();
        self.read()
            .into_iter()
            .filter(|item| item.query.to_lowercase().starts_with(&prefix))
            .take(limit)
            .collect()
    }

    /// Read and normalize the stored list; problems degrade to empty.
    fn read(&self) -> Vec<SearchHistoryItem> {
        match self.try_read() {
            Ok(items) => items,
            Err(e) => {
                warn!("search history '{}' unavailable: {e}", self.key);
                Vec::new()
            }
        }
    }

    fn try_read(&self) -> Result<Vec<SearchHistoryItem>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let mut items: Vec<SearchHistoryItem> = serde_json::from_str(&raw)?;

        // Stored lists are kept newest first; repair anything that is not.
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut seen: Vec<String> = Vec::with_capacity(items.len());
        items.retain(|item| {
            let folded = item.query.to_lowercase();
            if seen.contains(&folded) {
                false
            } else {
                seen.push(folded);
                true
            }
        });
        items.truncate(self.max_items);
        Ok(items)
    }

    fn write(&self, items: &[SearchHistoryItem]) {
        let result = serde_json::to_string(items)
            .map_err(Into::into)
            .and_then(|json| self.store.set(&self.key, &json));
        if let Err(e) = result {
            warn!("failed to write search history '{}': {e}", self.key);
        }
    }
}
