//! # Todo Engine Testing
//!
//! Testing utilities and helpers for the todo state engine.
//!
//! This crate provides:
//! - Mock implementations of Environment traits and storage ports
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todo_engine_testing::{InMemoryStorage, SequentialIdGenerator};
//!
//! #[test]
//! fn test_submit_flow() {
//!     let storage = InMemoryStorage::new();
//!     let mut engine = TodoEngine::with_id_source(storage.clone(), &Config::default(), |_| {
//!         Arc::new(SequentialIdGenerator::new())
//!     })
//!     .unwrap();
//!
//!     engine.set_input_text("buy milk").unwrap();
//!     engine.submit_input().unwrap();
//!
//!     assert_eq!(engine.item_count(), 1);
//!     assert!(storage.contains_key("todoAppKey"));
//! }
//! ```


/// Mock implementations of Environment traits and storage ports
pub mod mocks {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, RwLock};
    use todo_engine_core::environment::IdGenerator;
    use todo_engine_core::storage::{KeyValueStorage, StorageError};

    /// Predictable identifiers: `"1"`, `"2"`, `"3"`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use todo_engine_testing::mocks::SequentialIdGenerator;
    /// use todo_engine_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), "1");
    /// assert_eq!(ids.next_id(), "2");
    ///
    /// let ids = SequentialIdGenerator::with_prefix("todo-");
    /// assert_eq!(ids.next_id(), "todo-1");
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Ids counting up from `"1"`
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Ids counting up from `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                prefix: String::new(),
                next: AtomicU64::new(first),
            }
        }

        /// Ids counting up from `"<prefix>1"`
        #[must_use]
        pub fn with_prefix(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}{n}", self.prefix)
        }
    }

    /// Always returns the same identifier, for exercising id collisions
    #[derive(Debug, Clone)]
    pub struct FixedIdGenerator(String);

    impl FixedIdGenerator {
        /// Generator that always yields `id`
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }
    }

    impl IdGenerator for FixedIdGenerator {
        fn next_id(&self) -> String {
            self.0.clone()
        }
    }

    /// In-memory key/value storage for fast, deterministic tests.
    ///
    /// Clones share the same map, so a test can keep one handle to inspect
    /// what the store under test wrote through another.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_engine_testing::mocks::InMemoryStorage;
    /// use todo_engine_core::storage::KeyValueStorage;
    ///
    /// let storage = InMemoryStorage::new();
    /// let handle = storage.clone();
    ///
    /// storage.set("slot", "value").unwrap();
    /// assert_eq!(handle.get("slot").unwrap().as_deref(), Some("value"));
    /// assert_eq!(handle.write_count(), 1);
    /// ```
    #[derive(Clone, Debug, Default)]
    pub struct InMemoryStorage {
        data: Arc<RwLock<HashMap<String, String>>>,
        writes: Arc<AtomicUsize>,
    }

    impl InMemoryStorage {
        /// Create a new empty in-memory storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Storage pre-populated with one slot
        #[must_use]
        pub fn with_value(key: &str, value: &str) -> Self {
            let storage = Self::new();
            storage.write_map().insert(key.to_string(), value.to_string());
            storage
        }

        /// Check if a slot has been written
        #[must_use]
        pub fn contains_key(&self, key: &str) -> bool {
            self.read_map().contains_key(key)
        }

        /// Raw contents of a slot
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.read_map().get(key).cloned()
        }

        /// Number of successful `set` calls across all clones
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        // A poisoned lock only means another test thread panicked mid-write;
        // the map itself is still usable.
        fn read_map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
            self.data.read().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        fn write_map(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
            self.data.write().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.write_map().insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Storage whose operations fail with [`StorageError::Unavailable`].
    ///
    /// [`FailingStorage::new`] fails reads and writes;
    /// [`FailingStorage::writes_only`] reads an empty slot and fails writes,
    /// the shape of a full disk or exhausted quota.
    #[derive(Clone, Debug)]
    pub struct FailingStorage {
        reason: String,
        fail_reads: bool,
        attempts: Arc<AtomicUsize>,
    }

    impl FailingStorage {
        /// Fail every read and write with `reason`
        #[must_use]
        pub fn new(reason: impl Into<String>) -> Self {
            Self {
                reason: reason.into(),
                fail_reads: true,
                attempts: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Read as empty, fail every write with `reason`
        #[must_use]
        pub fn writes_only(reason: impl Into<String>) -> Self {
            Self {
                fail_reads: false,
                ..Self::new(reason)
            }
        }

        /// Number of write attempts seen across all clones
        #[must_use]
        pub fn write_attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                Err(StorageError::Unavailable(self.reason.clone()))
            } else {
                Ok(None)
            }
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable(self.reason.clone()))
        }
    }
}

// Re-export commonly used items
pub use mocks::{FailingStorage, FixedIdGenerator, InMemoryStorage, SequentialIdGenerator};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo_engine_core::environment::IdGenerator;
    use todo_engine_core::storage::{KeyValueStorage, StateSlot};

    #[test]
    fn sequential_ids_start_where_asked() {
        let ids = SequentialIdGenerator::starting_at(10);
        assert_eq!(ids.next_id(), "10");
        assert_eq!(ids.next_id(), "11");
    }

    #[test]
    fn fixed_ids_repeat() {
        let ids = FixedIdGenerator::new("42");
        assert_eq!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn in_memory_storage_backs_a_slot() {
        let storage = InMemoryStorage::new();
        let slot: StateSlot<Vec<u32>, _> = StateSlot::new(storage.clone(), "numbers");

        slot.save(&vec![1, 2, 3]).unwrap();

        assert_eq!(storage.raw("numbers").as_deref(), Some("[1,2,3]"));
        assert_eq!(slot.load().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn with_value_does_not_count_as_write() {
        let storage = InMemoryStorage::with_value("k", "v");
        assert!(storage.contains_key("k"));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn failing_storage_modes() {
        let both = FailingStorage::new("offline");
        assert!(both.get("k").is_err());
        assert!(both.set("k", "v").is_err());

        let writes = FailingStorage::writes_only("full");
        assert_eq!(writes.get("k").unwrap(), None);
        assert!(writes.set("k", "v").is_err());
        assert_eq!(writes.write_attempts(), 1);
    }
}
