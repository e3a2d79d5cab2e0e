//! Reducer logic for the todo list.
//!
//! Every action is applied in full and then persisted: the reducer mutates
//! the state and returns [`Effect::Persist`], which the store executes before
//! `send` returns.

use crate::sort::sort_by_text;
use crate::types::{TodoAction, TodoItem, TodoState};
use std::sync::Arc;
use todo_engine_core::{SmallVec, effect::Effect, environment::IdGenerator, reducer::Reducer, smallvec};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for submitted items
    pub ids: Arc<dyn IdGenerator>,
    /// Ignore submissions whose text is blank
    pub reject_empty_input: bool,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment` that accepts every submission
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            reject_empty_input: false,
        }
    }

    /// Set whether blank submissions are ignored
    #[must_use]
    pub const fn with_reject_empty_input(mut self, reject: bool) -> Self {
        self.reject_empty_input = reject;
        self
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("reject_empty_input", &self.reject_empty_input)
            .finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Turn the input text into an item and keep the list sorted
    fn submit(state: &mut TodoState, env: &TodoEnvironment) -> bool {
        if env.reject_empty_input && state.current_input_text.trim().is_empty() {
            tracing::debug!("Ignoring blank submission");
            return false;
        }

        let text = std::mem::take(&mut state.current_input_text);
        let item = TodoItem::new(env.ids.next_id(), text);
        tracing::debug!(id = %item.id, "Adding item");

        state.items.push(item);
        state.items = sort_by_text(&state.items);
        true
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect; 4]> {
        match action {
            TodoAction::SetInputText { text } => {
                state.current_input_text = text;
            }

            TodoAction::SubmitInput => {
                if !Self::submit(state, env) {
                    return smallvec![Effect::None];
                }
            }

            TodoAction::SetCompletion { id, completed } => {
                if state.get(&id).is_none() {
                    tracing::debug!(%id, "Recording completion for an id with no item");
                }
                state.completion.set(id, completed);
            }

            TodoAction::SetFilter { filter } => {
                state.active_filter = filter;
            }
        }

        smallvec![Effect::Persist]
    }
}
