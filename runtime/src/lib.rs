//! # Todo Engine Runtime
//!
//! Runtime implementation for the todo state engine.
//!
//! This crate provides the [`Store`] that coordinates reducer execution,
//! effect handling and write-through persistence.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, runs the reducer, executes effects
//! - **Hydration**: Restores state from a [`StateSlot`] under a [`RecoveryPolicy`]
//! - **`FileStorage`**: Durable key/value slots on the local file system
//!
//! ## Execution Model
//!
//! Everything is synchronous and single-threaded. `send` reduces the action,
//! then executes every effect it returned, writing the state through the slot
//! before returning. There is exactly one writer, so no locking is involved.
//!
//! ## Example
//!
//! ```ignore
//! use todo_engine_runtime::{Store, StoreConfig};
//!
//! let mut store = Store::hydrate(my_reducer, slot, &StoreConfig::default(), |state| {
//!     environment_for(state)
//! })?;
//!
//! store.send(Action::DoSomething)?;
//! let value = store.state(|s| s.some_field.clone());
//! ```

use todo_engine_core::storage::StorageError;

/// File-backed key/value storage
pub mod file_storage;

/// Prometheus metrics for observability
pub mod metrics;

pub use file_storage::FileStorage;
pub use store::Store;
pub use todo_engine_core::storage::StateSlot;

/// Error types for the Store runtime
pub mod error {
    use super::StorageError;
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Writing the state through the slot failed.
        ///
        /// The action was still applied to the in-memory state; only
        /// durability failed. The next successful write catches the slot up.
        #[error("Failed to persist state: {0}")]
        Persistence(#[source] StorageError),

        /// Stored state could not be restored at startup.
        #[error("Failed to hydrate state: {0}")]
        Hydration(#[source] StorageError),
    }

    impl StoreError {
        /// The storage error behind this failure
        #[must_use]
        pub const fn storage_error(&self) -> &StorageError {
            match self {
                Self::Persistence(e) | Self::Hydration(e) => e,
            }
        }
    }
}

pub use error::StoreError;

/// What hydration does when the stored snapshot is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Log the corruption and start from the default state. The corrupt blob
    /// is overwritten by the next successful write.
    #[default]
    FallBackToDefault,

    /// Refuse to start: hydration returns [`StoreError::Hydration`].
    Fail,
}

impl std::str::FromStr for RecoveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" | "default" => Ok(Self::FallBackToDefault),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown recovery policy '{other}'")),
        }
    }
}

impl std::fmt::Display for RecoveryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FallBackToDefault => write!(f, "fallback"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Configuration for Store behavior
///
/// # Example
///
/// ```
/// use todo_engine_runtime::{RecoveryPolicy, StoreConfig};
///
/// let config = StoreConfig::default().with_recovery(RecoveryPolicy::Fail);
/// assert_eq!(config.recovery, RecoveryPolicy::Fail);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Handling of a corrupt snapshot during hydration
    pub recovery: RecoveryPolicy,
}

impl StoreConfig {
    /// Set the recovery policy
    #[must_use]
    pub const fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::metrics::StoreMetrics;
    use super::{RecoveryPolicy, StoreConfig, StoreError};
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use todo_engine_core::effect::Effect;
    use todo_engine_core::reducer::Reducer;
    use todo_engine_core::storage::{KeyValueStorage, StateSlot};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store:
    /// 1. Owns the current state
    /// 2. Receives actions via `send()`
    /// 3. Calls the reducer with (state, action, environment)
    /// 4. Executes returned effects, persisting through its slot
    ///
    /// # Type Parameters
    ///
    /// - `R`: Reducer implementation (fixes state, action and environment types)
    /// - `K`: Key/value storage backing the persistence slot
    pub struct Store<R, K>
    where
        R: Reducer,
    {
        state: R::State,
        reducer: R,
        environment: R::Environment,
        slot: StateSlot<R::State, K>,
    }

    impl<R, K> Store<R, K>
    where
        R: Reducer,
        R::State: Serialize + DeserializeOwned,
        K: KeyValueStorage,
    {
        /// Create a store around an already-built state
        ///
        /// Nothing is read from or written to the slot until the first
        /// effect asks for it.
        #[must_use]
        pub fn new(
            initial_state: R::State,
            reducer: R,
            environment: R::Environment,
            slot: StateSlot<R::State, K>,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                slot,
            }
        }

        /// Create a store whose state is restored from `slot`
        ///
        /// - Empty slot: start from `R::State::default()`
        /// - Corrupt slot: governed by `config.recovery`
        ///
        /// `make_env` receives the hydrated state, so dependencies that must
        /// agree with persisted data (e.g. an id counter) can be seeded from it.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Hydration`] if the slot cannot be read, or holds a
        ///   corrupt snapshot under [`RecoveryPolicy::Fail`]
        #[tracing::instrument(skip_all, name = "store_hydrate", fields(key = slot.key()))]
        pub fn hydrate<F>(
            reducer: R,
            slot: StateSlot<R::State, K>,
            config: &StoreConfig,
            make_env: F,
        ) -> Result<Self, StoreError>
        where
            R::State: Default,
            F: FnOnce(&R::State) -> R::Environment,
        {
            let state = match slot.load() {
                Ok(Some(state)) => {
                    tracing::debug!("Hydrated state from storage");
                    state
                }
                Ok(None) => {
                    tracing::debug!("No stored state, starting from default");
                    R::State::default()
                }
                Err(err) if err.is_corrupt() && config.recovery == RecoveryPolicy::FallBackToDefault => {
                    tracing::warn!(error = %err, "Discarding corrupt stored state, starting from default");
                    StoreMetrics::record_hydration_recovered();
                    R::State::default()
                }
                Err(err) => {
                    tracing::error!(error = %err, "Unable to hydrate state");
                    return Err(StoreError::Hydration(err));
                }
            };

            let environment = make_env(&state);
            Ok(Self::new(state, reducer, environment, slot))
        }

        /// Send an action to the store
        ///
        /// Reduces the action, then executes the effects it returned, in
        /// order, before returning.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Persistence`] if a persist effect fails. The
        /// state keeps the mutation; effects after the failing one are not
        /// executed.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub fn send(&mut self, action: R::Action) -> Result<(), StoreError> {
            tracing::debug!("Processing action");

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                StoreMetrics::record_action(start.elapsed());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect)?;
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.items.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            f(&self.state)
        }

        /// Borrow the current state
        #[must_use]
        pub const fn current_state(&self) -> &R::State {
            &self.state
        }

        /// The injected dependencies
        #[must_use]
        pub const fn environment(&self) -> &R::Environment {
            &self.environment
        }

        /// The persistence slot
        #[must_use]
        pub const fn slot(&self) -> &StateSlot<R::State, K> {
            &self.slot
        }

        /// Write the current state through the slot
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Persistence`] if the write fails.
        pub fn persist(&self) -> Result<(), StoreError> {
            match self.slot.save(&self.state) {
                Ok(()) => {
                    StoreMetrics::record_persist(true);
                    tracing::trace!(key = self.slot.key(), "State persisted");
                    Ok(())
                }
                Err(err) => {
                    StoreMetrics::record_persist(false);
                    tracing::error!(key = self.slot.key(), error = %err, "Failed to persist state");
                    Err(StoreError::Persistence(err))
                }
            }
        }

        fn execute_effect(&self, effect: Effect) -> Result<(), StoreError> {
            match effect {
                Effect::None => Ok(()),
                Effect::Persist => self.persist(),
            }
        }
    }

    impl<R, K> std::fmt::Debug for Store<R, K>
    where
        R: Reducer,
        R::State: std::fmt::Debug,
        K: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .field("slot", &self.slot)
                .finish_non_exhaustive()
        }
    }
}
