//! The todo state engine: a store running [`TodoReducer`] over one storage
//! slot, with one method per view event.

use crate::config::Config;
use crate::filter::Filter;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use thiserror::Error;
use todo_engine_core::environment::IdGenerator;
use todo_engine_core::storage::{KeyValueStorage, StateSlot, StorageError};
use todo_engine_runtime::{FileStorage, Store, StoreError};

/// Errors from opening or driving a [`TodoEngine`]
#[derive(Error, Debug)]
pub enum EngineError {
    /// The storage backend could not be opened
    #[error("Failed to open storage: {0}")]
    Storage(#[from] StorageError),

    /// Hydration or persistence failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Single-user todo list with write-through persistence
///
/// Every operation is applied to the in-memory state and saved before it
/// returns. If saving fails the operation still took effect in memory and
/// the error is returned; the next successful save catches storage up.
///
/// # Example
///
/// ```
/// use todo::{Config, Filter, TodoEngine};
/// use todo_engine_testing::InMemoryStorage;
///
/// # fn main() -> Result<(), todo::EngineError> {
/// let mut engine = TodoEngine::with_storage(InMemoryStorage::new(), &Config::default())?;
///
/// engine.set_input_text("buy milk")?;
/// engine.submit_input()?;
/// engine.set_filter(Filter::Active)?;
///
/// assert_eq!(engine.visible_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct TodoEngine<K> {
    store: Store<TodoReducer, K>,
}

impl TodoEngine<FileStorage> {
    /// Open the engine on the file storage named by `config`
    ///
    /// # Errors
    ///
    /// - [`EngineError::Storage`] if the storage directory cannot be created
    /// - [`EngineError::Store`] if the saved state cannot be restored
    #[tracing::instrument(skip_all, fields(dir = %config.storage_dir.display(), key = %config.storage_key))]
    pub fn open(config: &Config) -> Result<Self, EngineError> {
        let storage = FileStorage::open(&config.storage_dir)?;
        Self::with_storage(storage, config)
    }
}

impl<K> TodoEngine<K>
where
    K: KeyValueStorage,
{
    /// Open the engine on any storage backend
    ///
    /// Ids come from the generator named by `config.id_scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the saved state cannot be restored.
    pub fn with_storage(storage: K, config: &Config) -> Result<Self, EngineError> {
        let scheme = config.id_scheme;
        Self::with_id_source(storage, config, |state| scheme.build(state))
    }

    /// Open the engine with an explicit id generator
    ///
    /// `make_ids` receives the restored state so it can start past the ids
    /// already in use.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the saved state cannot be restored.
    pub fn with_id_source<F>(storage: K, config: &Config, make_ids: F) -> Result<Self, EngineError>
    where
        F: FnOnce(&TodoState) -> Arc<dyn IdGenerator>,
    {
        let slot = StateSlot::new(storage, config.storage_key.clone());
        let reject_empty_input = config.reject_empty_input;

        let store = Store::hydrate(TodoReducer::new(), slot, &config.store_config(), |state| {
            TodoEnvironment::new(make_ids(state)).with_reject_empty_input(reject_empty_input)
        })?;

        tracing::info!(
            items = store.current_state().item_count(),
            filter = %store.current_state().active_filter,
            "Todo engine ready"
        );
        Ok(Self { store })
    }

    /// Replace the input text
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the new state cannot be saved.
    pub fn set_input_text(&mut self, text: impl Into<String>) -> Result<(), EngineError> {
        self.send(TodoAction::SetInputText { text: text.into() })
    }

    /// Turn the input text into a new item
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the new state cannot be saved.
    pub fn submit_input(&mut self) -> Result<(), EngineError> {
        self.send(TodoAction::SubmitInput)
    }

    /// Flag an item completed or not
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the new state cannot be saved.
    pub fn set_completion(&mut self, id: impl Into<TodoId>, completed: bool) -> Result<(), EngineError> {
        self.send(TodoAction::SetCompletion {
            id: id.into(),
            completed,
        })
    }

    /// Select the visible subset
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the new state cannot be saved.
    pub fn set_filter(&mut self, filter: Filter) -> Result<(), EngineError> {
        self.send(TodoAction::SetFilter { filter })
    }

    /// Apply any action
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the new state cannot be saved.
    pub fn send(&mut self, action: TodoAction) -> Result<(), EngineError> {
        Ok(self.store.send(action)?)
    }

    /// The full current state
    #[must_use]
    pub fn state(&self) -> &TodoState {
        self.store.current_state()
    }

    /// Items passing the active filter, in list order
    #[must_use]
    pub fn visible_items(&self) -> Vec<&TodoItem> {
        self.state().visible_items()
    }

    /// Number of items passing the active filter
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.state().visible_count()
    }

    /// Whether the item with `id` is flagged completed
    #[must_use]
    pub fn is_completed(&self, id: &TodoId) -> bool {
        self.state().is_completed(id)
    }

    /// Total number of items
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.state().item_count()
    }

    /// Whether there are no items at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().is_empty()
    }

    /// The storage slot the state is saved in
    #[must_use]
    pub fn slot(&self) -> &StateSlot<TodoState, K> {
        self.store.slot()
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for TodoEngine<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEngine").field("store", &self.store).finish()
    }
}
