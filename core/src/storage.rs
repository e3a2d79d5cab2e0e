//! Durable key/value storage and state persistence.
//!
//! The engine persists its complete state as one serialized blob under one
//! fixed key.
//! This module splits that into two layers:
//!
//! - [`KeyValueStorage`]: the raw slot store (file system, memory, ...)
//! - [`StateSlot`]: binds a storage and a key to a serializable state type and
//!   owns the JSON encoding
//!
//! # Implementations
//!
//! - `FileStorage` (in `todo-engine-runtime`): one file per key on disk
//! - `InMemoryStorage` / `FailingStorage` (in `todo-engine-testing`): tests
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::collections::HashMap;
//! use todo_engine_core::storage::{KeyValueStorage, StateSlot, StorageError};
//!
//! #[derive(Default)]
//! struct MapStorage(RefCell<HashMap<String, String>>);
//!
//! impl KeyValueStorage for MapStorage {
//!     fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
//!         Ok(self.0.borrow().get(key).cloned())
//!     }
//!
//!     fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
//!         self.0.borrow_mut().insert(key.to_string(), value.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let slot: StateSlot<Vec<String>, _> = StateSlot::new(MapStorage::default(), "list");
//! assert_eq!(slot.load()?, None);
//!
//! slot.save(&vec!["milk".to_string()])?;
//! assert_eq!(slot.load()?, Some(vec!["milk".to_string()]));
//! # Ok::<(), StorageError>(())
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while reading or writing a storage slot.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failure (disk full, permissions, ...)
    #[error("I/O error on slot '{key}': {source}")]
    Io {
        /// The slot being accessed
        key: String,
        /// The originating I/O error
        #[source]
        source: std::io::Error,
    },

    /// The slot holds a value that does not decode into the expected state.
    #[error("Corrupt value in slot '{key}': {reason}")]
    Corrupt {
        /// The slot holding the bad value
        key: String,
        /// Decoder message
        reason: String,
    },

    /// The state could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend refused the operation (quota exceeded, read-only, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Returns true if the slot was readable but its contents were malformed
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Synchronous key/value storage.
///
/// Writes overwrite the previous value and are atomic from the caller's
/// point of view: a reader sees either the old value or the new one.
///
/// Methods take `&self`; implementations that need mutation use interior
/// mutability so a handle can be cloned and inspected in tests while the
/// store owns another.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// A single storage key holding one JSON-encoded state value.
pub struct StateSlot<S, K> {
    storage: K,
    key: String,
    _state: PhantomData<fn() -> S>,
}

impl<S, K> StateSlot<S, K>
where
    S: Serialize + DeserializeOwned,
    K: KeyValueStorage,
{
    /// Bind `storage` to the slot named `key`
    #[must_use]
    pub fn new(storage: K, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _state: PhantomData,
        }
    }

    /// The slot's key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage
    #[must_use]
    pub const fn storage(&self) -> &K {
        &self.storage
    }

    /// Read and decode the stored state.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Corrupt`] if the blob is not a valid encoding of `S`
    /// - any error the backend reports while reading
    pub fn load(&self) -> Result<Option<S>, StorageError> {
        let Some(blob) = self.storage.get(&self.key)? else {
            return Ok(None);
        };

        serde_json::from_str(&blob)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: self.key.clone(),
                reason: e.to_string(),
            })
    }

    /// Encode `state` and overwrite the slot with it.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Serialization`] if `state` cannot be encoded
    /// - any error the backend reports while writing
    pub fn save(&self, state: &S) -> Result<(), StorageError> {
        let blob =
            serde_json::to_string(state).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &blob)
    }
}

impl<S, K: std::fmt::Debug> std::fmt::Debug for StateSlot<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSlot")
            .field("key", &self.key)
            .field("storage", &self.storage)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default, Debug)]
    struct MapStorage(RefCell<HashMap<String, String>>);

    impl KeyValueStorage for MapStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.0.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn empty_slot_loads_none() {
        let slot: StateSlot<u32, _> = StateSlot::new(MapStorage::default(), "n");
        assert!(slot.load().unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_value() {
        let slot: StateSlot<u32, _> = StateSlot::new(MapStorage::default(), "n");
        slot.save(&1).unwrap();
        slot.save(&2).unwrap();
        assert_eq!(slot.load().unwrap(), Some(2));
        assert_eq!(slot.storage().0.borrow().len(), 1);
    }

    #[test]
    fn malformed_blob_is_corrupt() {
        let storage = MapStorage::default();
        storage.set("n", "{not json").unwrap();
        let slot: StateSlot<u32, _> = StateSlot::new(storage, "n");

        let err = slot.load().unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("'n'"));
    }

    #[test]
    fn slots_are_independent() {
        let storage = Arc::new(MapStorage::default());
        let a: StateSlot<String, _> = StateSlot::new(Arc::clone(&storage), "a");
        let b: StateSlot<String, _> = StateSlot::new(Arc::clone(&storage), "b");

        a.save(&"left".to_string()).unwrap();
        assert_eq!(b.load().unwrap(), None);
        assert_eq!(a.load().unwrap().as_deref(), Some("left"));
    }
}
