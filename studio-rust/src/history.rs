use crate::store::{KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const HISTORY_CAPACITY: usize = 20;

const HISTORY_KEY: &str = "history";

/// One prior generation, unique by image content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub prompt: String,
    pub image_data_url: String,
}

/// Bounded most-recent-first cache of prior generations, persisted under the
/// `history` slot.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Loads persisted history. Missing or corrupt data starts empty.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(%error, "discarding corrupt history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(%error, "failed to read history");
                Vec::new()
            }
        };
        Self { store, entries }
    }

    /// Records an entry at the head. An entry with identical image content
    /// moves to the front instead of duplicating; the list is truncated to
    /// [`HISTORY_CAPACITY`] and persisted.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), StoreError> {
        if let Some(position) = self
            .entries
            .iter()
            .position(|existing| existing.image_data_url == entry.image_data_url)
        {
            self.entries.remove(position);
        }
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist()
    }

    /// Empties the list and persists the empty state.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.entries)?;
        self.store.set(HISTORY_KEY, &json)
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
