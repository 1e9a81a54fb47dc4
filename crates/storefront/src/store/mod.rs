//! Persistent store adapter for cart and UI state.
//!
//! Mirrors the browser-local-storage contract: string keys, string values,
//! best-effort durability. Persisted state is a cache, never a source of
//! truth — a missing, unreadable, or malformed value always degrades to a
//! default instead of surfacing an error to the caller.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Keys for persisted state.
pub mod keys {
    /// Serialized cart lines.
    pub const CART: &str = "cart";

    /// Bearer token for the logged-in user.
    pub const USER_TOKEN: &str = "user_token";

    /// Admin-configured deal poster content.
    pub const DEAL_POSTER: &str = "deal_poster";

    /// Admin-selected categories for the home page.
    pub const HOME_CATEGORIES: &str = "home_categories";

    /// Admin-selected categories for the header menu.
    pub const HEADER_CATEGORIES: &str = "header_categories";

    /// Featured-product popup configuration.
    pub const FEATURED_POPUP: &str = "featured_popup";
}

/// Errors from the raw key/value layer.
///
/// These never cross the adapter boundary on reads; [`load_or_default`]
/// swallows them. Writes report them so callers can log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage is unavailable or unwritable.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A keyed string-value store.
///
/// Implementations only move raw strings; serialization lives in the
/// [`save`] and [`load_or_default`] helpers so every value shares the same
/// degrade-to-default parse semantics.
pub trait StateStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Retrieve the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove the value stored under `key`. Removing an absent key is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Serialize `value` as JSON and store it under `key`.
///
/// Persistence is best-effort: failures are logged and swallowed so a full
/// disk or read-only directory never breaks a cart mutation.
pub fn save<T: Serialize + ?Sized>(store: &dyn StateStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => {
            if let Err(e) = store.put(key, &raw) {
                tracing::warn!(key, error = %e, "failed to persist state");
            }
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to serialize state");
        }
    }
}

/// Load and deserialize the value under `key`, or fall back to `T::default()`.
///
/// Absent keys, unreadable storage, and malformed JSON all yield the
/// default; malformed values are additionally logged at debug level.
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn StateStore, key: &str) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::debug!(key, error = %e, "state unreadable, starting fresh");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::debug!(key, error = %e, "stored state malformed, starting fresh");
        T::default()
    })
}

// =============================================================================
// File-backed store
// =============================================================================

/// Store backed by one JSON file per key inside a state directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(std::fs::write(self.path(key), value)?)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Volatile store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
