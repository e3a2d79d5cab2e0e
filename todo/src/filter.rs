//! Filter selection and the visible-item projection.

use crate::types::{CompletionMap, TodoItem};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which items are visible
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not marked completed
    Active,
    /// Items marked completed
    Completed,
}

impl Filter {
    /// All filter values, in display order
    pub const VALUES: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether an item with the given completion flag passes this filter
    #[must_use]
    pub const fn admits(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// Wire name (`"all"`, `"active"`, `"completed"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown filter '{0}' (expected all, active or completed)")]
pub struct ParseFilterError(String);

impl std::str::FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VALUES
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// Project `items` through `filter`.
///
/// Keeps the relative order of `items`; nothing is duplicated or reordered.
/// An item is completed only when its flag is present and `true`.
#[must_use]
pub fn project<'a>(items: &'a [TodoItem], completion: &CompletionMap, filter: Filter) -> Vec<&'a TodoItem> {
    items
        .iter()
        .filter(|item| filter.admits(completion.is_completed(&item.id)))
        .collect()
}
