use crate::store::{KeyValueStore, StoreError};
use std::sync::Arc;

const API_KEY_KEY: &str = "api_key";

/// Persisted API credential: an optional user-supplied key overriding an
/// optional default.
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
    default_key: Option<String>,
}

impl Settings {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, default_key: Option<String>) -> Self {
        Self { store, default_key }
    }

    /// The user-supplied key, if one is stored.
    pub fn user_key(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(API_KEY_KEY)?
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty()))
    }

    /// The key to authenticate with: the user key when present, otherwise
    /// the default.
    pub fn active_key(&self) -> Result<Option<String>, StoreError> {
        Ok(self.user_key()?.or_else(|| self.default_key.clone()))
    }

    /// Stores the user key. An empty or whitespace-only key clears the slot.
    pub fn save_key(&self, key: &str) -> Result<(), StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return self.clear_key();
        }
        self.store.set(API_KEY_KEY, key)
    }

    pub fn clear_key(&self) -> Result<(), StoreError> {
        self.store.remove(API_KEY_KEY)
    }
}
