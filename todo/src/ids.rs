//! Identifier generators for new items.

use crate::types::TodoState;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use todo_engine_core::environment::IdGenerator;

/// Upper bound (exclusive) of the random id range
pub const RANDOM_ID_BOUND: u64 = 10_000_000;

/// Ids drawn uniformly from `[0, 10_000_000)`
///
/// The older id format. Two items can receive the same id; nothing detects
/// or corrects that.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        rand::thread_rng().gen_range(0..RANDOM_ID_BOUND).to_string()
    }
}

/// Strictly increasing decimal ids
///
/// # Example
///
/// ```
/// use todo::{MonotonicIdGenerator, TodoItem, TodoState};
/// use todo_engine_core::environment::IdGenerator;
///
/// let mut state = TodoState::new();
/// state.items.push(TodoItem::new("41", "stored earlier"));
///
/// let ids = MonotonicIdGenerator::after(&state);
/// assert_eq!(ids.next_id(), "42");
/// assert_eq!(ids.next_id(), "43");
/// ```
#[derive(Debug)]
pub struct MonotonicIdGenerator {
    next: AtomicU64,
}

impl MonotonicIdGenerator {
    /// Counter whose first id is `first`
    #[must_use]
    pub const fn new(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Counter starting past every numeric id already held by `state`
    #[must_use]
    pub fn after(state: &TodoState) -> Self {
        Self::new(state.max_numeric_id().map_or(1, |max| max.saturating_add(1)))
    }
}

impl Default for MonotonicIdGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn next_id(&self) -> String {
        // Saturates at u64::MAX rather than wrapping back onto used ids.
        let id = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_add(1)))
            .unwrap_or_else(|n| n);
        id.to_string()
    }
}

/// Which generator new items get their ids from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdScheme {
    /// [`MonotonicIdGenerator`] seeded from the hydrated state
    #[default]
    Monotonic,
    /// [`RandomIdGenerator`]
    Random,
}

impl IdScheme {
    /// Build the generator for this scheme, given the hydrated state
    #[must_use]
    pub fn build(self, state: &TodoState) -> Arc<dyn IdGenerator> {
        match self {
            Self::Monotonic => Arc::new(MonotonicIdGenerator::after(state)),
            Self::Random => Arc::new(RandomIdGenerator),
        }
    }
}

/// Returned when a string names no id scheme
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown id scheme '{0}' (expected monotonic or random)")]
pub struct ParseIdSchemeError(String);

impl std::str::FromStr for IdScheme {
    type Err = ParseIdSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(Self::Monotonic),
            "random" => Ok(Self::Random),
            _ => Err(ParseIdSchemeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for IdScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monotonic => write!(f, "monotonic"),
            Self::Random => write!(f, "random"),
        }
    }
}
