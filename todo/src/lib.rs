//! Single-user todo list state engine.
//!
//! Holds the text being typed, a list of items kept sorted by text, a
//! completion flag per item id and the active filter. Every operation is
//! saved to durable storage before it returns, and the saved state is
//! restored on the next start.
//!
//! - [`sort`]: stable bubble sort used to keep the list ordered
//! - [`filter`]: the All / Active / Completed projection
//! - [`ids`]: identifier generators for new items
//! - [`TodoReducer`]: applies [`TodoAction`]s to [`TodoState`]
//! - [`TodoEngine`]: the store-backed facade the view talks to
//!
//! # Quick Start
//!
//! ```no_run
//! use todo::{Config, Filter, TodoEngine};
//!
//! # fn example() -> Result<(), todo::EngineError> {
//! let mut engine = TodoEngine::open(&Config::from_env())?;
//!
//! engine.set_input_text("buy milk")?;
//! engine.submit_input()?;
//!
//! let id = engine.state().items[0].id.clone();
//! engine.set_completion(id, true)?;
//! engine.set_filter(Filter::Completed)?;
//!
//! for item in engine.visible_items() {
//!     println!("{}", item.text);
//! }
//! println!("{} visible", engine.visible_count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod filter;
pub mod ids;
pub mod reducer;
pub mod sort;
pub mod types;

/// Storage key the state is saved under unless configured otherwise
pub const STORAGE_KEY: &str = "todoAppKey";

// Re-export commonly used types
pub use config::Config;
pub use engine::{EngineError, TodoEngine};
pub use filter::Filter;
pub use ids::{IdScheme, MonotonicIdGenerator, RandomIdGenerator};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{CompletionMap, TodoAction, TodoId, TodoItem, TodoState};
