//! Domain types for the todo list.
//!
//! [`TodoState`] is the complete engine state and is persisted as a whole.
//! Its JSON layout is fixed:
//!
//! ```json
//! {
//!   "currentInputText": "",
//!   "activeFilter": "all",
//!   "items": [{ "id": "1", "text": "buy milk" }],
//!   "completion": { "1": true }
//! }
//! ```
//!
//! The older field names (`currentText`, `todoItems`, `completedState`, plus
//! a per-item `selected` flag) load as well; saving always writes the layout
//! above.

use crate::filter::{Filter, project};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a todo item
///
/// Opaque text; generators in this crate produce decimal digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap an identifier string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as a number, when it is made only of decimal digits
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single todo item
///
/// Neither field changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Identifier, assigned at creation
    pub id: TodoId,
    /// Free text entered by the user
    pub text: String,
}

impl TodoItem {
    /// Creates a new todo item
    #[must_use]
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Completion flags keyed by item id
///
/// An id without an entry is not completed. Entries are only ever inserted
/// or replaced, never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionMap(BTreeMap<TodoId, bool>);

impl CompletionMap {
    /// Whether `id` is flagged completed
    #[must_use]
    pub fn is_completed(&self, id: &TodoId) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// The stored flag for `id`, if any
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<bool> {
        self.0.get(id).copied()
    }

    /// Insert or replace the flag for `id`, leaving every other entry alone
    pub fn set(&mut self, id: TodoId, completed: bool) {
        self.0.insert(id, completed);
    }

    /// Number of stored flags
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no flag has ever been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stored flags in id order
    pub fn iter(&self) -> impl Iterator<Item = (&TodoId, bool)> {
        self.0.iter().map(|(id, completed)| (id, *completed))
    }
}

/// State of the todo list
///
/// This is the full engine state: it is what the view renders from and
/// what gets persisted after every action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoState {
    /// Text currently typed into the input, not yet submitted
    #[serde(alias = "currentText")]
    pub current_input_text: String,
    /// Which items are visible
    pub active_filter: Filter,
    /// All items, kept sorted by text
    #[serde(alias = "todoItems")]
    pub items: Vec<TodoItem>,
    /// Completion flags, independent of `items`
    #[serde(alias = "completedState")]
    pub completion: CompletionMap,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items passing the active filter, in list order
    #[must_use]
    pub fn visible_items(&self) -> Vec<&TodoItem> {
        project(&self.items, &self.completion, self.active_filter)
    }

    /// Number of items passing the active filter
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible_items().len()
    }

    /// Whether `id` is flagged completed
    #[must_use]
    pub fn is_completed(&self, id: &TodoId) -> bool {
        self.completion.is_completed(id)
    }

    /// Total number of items, ignoring the filter
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no items at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item with `id`
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Largest numeric id among items and completion entries
    #[must_use]
    pub fn max_numeric_id(&self) -> Option<u64> {
        self.items
            .iter()
            .map(|item| &item.id)
            .chain(self.completion.iter().map(|(id, _)| id))
            .filter_map(TodoId::as_number)
            .max()
    }
}

/// Actions for the todo list
///
/// One variant per input event the view emits: text changed, submit
/// pressed, completion toggled, filter selected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// The input text changed
    SetInputText {
        /// Full new input text
        text: String,
    },

    /// The input was submitted: turn it into an item
    SubmitInput,

    /// An item's checkbox was toggled
    SetCompletion {
        /// Item to flag
        id: TodoId,
        /// New flag value
        completed: bool,
    },

    /// A filter was selected
    SetFilter {
        /// Filter to show
        filter: Filter,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_empty() {
        let state = TodoState::new();
        assert_eq!(state.current_input_text, "");
        assert_eq!(state.active_filter, Filter::All);
        assert!(state.is_empty());
        assert!(state.completion.is_empty());
        assert_eq!(state.max_numeric_id(), None);
    }

    #[test]
    fn serializes_with_fixed_layout() {
        let mut state = TodoState::new();
        state.current_input_text = "draft".to_string();
        state.active_filter = Filter::Active;
        state.items.push(TodoItem::new("12", "buy milk"));
        state.completion.set(TodoId::from("12"), true);

        let json: serde_json::Value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "currentInputText": "draft",
                "activeFilter": "active",
                "items": [{ "id": "12", "text": "buy milk" }],
                "completion": { "12": true }
            })
        );
    }

    #[test]
    fn loads_legacy_layout() {
        let legacy = r#"{
            "currentText": "",
            "todoItems": [{ "id": "4411", "text": "walk dog", "selected": false }],
            "activeFilter": "completed",
            "completedState": { "4411": true }
        }"#;

        let state: TodoState = serde_json::from_str(legacy).unwrap();
        assert_eq!(state.items, vec![TodoItem::new("4411", "walk dog")]);
        assert_eq!(state.active_filter, Filter::Completed);
        assert!(state.is_completed(&TodoId::from("4411")));
    }

    #[test]
    fn missing_field_is_rejected() {
        let partial = r#"{ "currentInputText": "", "activeFilter": "all", "items": [] }"#;
        assert!(serde_json::from_str::<TodoState>(partial).is_err());
    }

    #[test]
    fn completion_set_replaces_single_entry() {
        let mut completion = CompletionMap::default();
        completion.set(TodoId::from("1"), true);
        completion.set(TodoId::from("2"), true);
        completion.set(TodoId::from("1"), false);

        assert_eq!(completion.get(&TodoId::from("1")), Some(false));
        assert_eq!(completion.get(&TodoId::from("2")), Some(true));
        assert_eq!(completion.get(&TodoId::from("3")), None);
        assert_eq!(completion.len(), 2);
    }

    #[test]
    fn numeric_ids() {
        assert_eq!(TodoId::from("0042").as_number(), Some(42));
        assert_eq!(TodoId::from("+5").as_number(), None);
        assert_eq!(TodoId::from("").as_number(), None);
        assert_eq!(TodoId::from("todo-1").as_number(), None);

        let mut state = TodoState::new();
        state.items.push(TodoItem::new("9", "a"));
        state.items.push(TodoItem::new("x", "b"));
        state.completion.set(TodoId::from("120"), false);
        assert_eq!(state.max_numeric_id(), Some(120));
    }
}
