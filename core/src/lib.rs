//! # Todo Engine Core
//!
//! Core traits and types for the todo state engine.
//!
//! The engine follows the Reducer pattern: every input is an action, a pure
//! reducer folds the action into state and returns descriptions of the side
//! effects it needs, and a runtime `Store` executes those effects.
//!
//! ## Core Concepts
//!
//! - **State**: The complete domain state (for the todo list, the persisted snapshot)
//! - **Action**: All possible inputs to a reducer (view events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//! - **Storage**: Durable key/value slots the runtime persists state into
//!
//! ## Example
//!
//! ```
//! use todo_engine_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::Persist]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Durable key/value storage port and the JSON state slot built on it
pub mod storage;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most reducers return zero or one effect, so effects are returned
        /// inline in a `SmallVec` and only spill to the heap past four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values, not execution.
pub mod effect {
    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime before `send` returns.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Effect {
        /// No-op effect
        None,

        /// Write the store's current state through its persistence slot
        Persist,
    }

    impl Effect {
        /// Returns true if this effect persists state
        #[must_use]
        pub const fn persists(self) -> bool {
            matches!(self, Effect::Persist)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    /// Identifier source for newly created entities
    ///
    /// Production code injects a monotonic or random generator; tests inject
    /// a sequential one so identifiers are predictable.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::{AtomicU64, Ordering};
    /// use todo_engine_core::environment::IdGenerator;
    ///
    /// struct Counter(AtomicU64);
    ///
    /// impl IdGenerator for Counter {
    ///     fn next_id(&self) -> String {
    ///         self.0.fetch_add(1, Ordering::Relaxed).to_string()
    ///     }
    /// }
    ///
    /// let ids = Counter(AtomicU64::new(7));
    /// assert_eq!(ids.next_id(), "7");
    /// assert_eq!(ids.next_id(), "8");
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        fn next_id(&self) -> String;
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn only_persist_persists() {
        assert!(Effect::Persist.persists());
        assert!(!Effect::None.persists());
    }
}
