//! Configuration for the todo engine.
//!
//! Settings come from environment variables; a value that is missing or does
//! not parse leaves the default in place.
//!
//! | Variable                  | Default      |
//! |---------------------------|--------------|
//! | `TODO_STORAGE_DIR`        | `.todo`      |
//! | `TODO_STORAGE_KEY`        | `todoAppKey` |
//! | `TODO_ID_SCHEME`          | `monotonic`  |
//! | `TODO_RECOVERY`           | `fallback`   |
//! | `TODO_REJECT_EMPTY_INPUT` | `false`      |
//! | `TODO_PRINT_METRICS`      | `false`      |

use crate::STORAGE_KEY;
use crate::ids::IdScheme;
use std::path::PathBuf;
use std::str::FromStr;
use todo_engine_runtime::{RecoveryPolicy, StoreConfig};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the storage files
    pub storage_dir: PathBuf,
    /// Key of the slot the state is saved under
    pub storage_key: String,
    /// Generator for new item ids
    pub id_scheme: IdScheme,
    /// What to do with a corrupt saved state
    pub recovery: RecoveryPolicy,
    /// Ignore submissions whose text is blank
    pub reject_empty_input: bool,
    /// Print the Prometheus exposition when the demo finishes
    pub print_metrics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".todo"),
            storage_key: STORAGE_KEY.to_string(),
            id_scheme: IdScheme::default(),
            recovery: RecoveryPolicy::default(),
            reject_empty_input: false,
            print_metrics: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            storage_dir: lookup("TODO_STORAGE_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map_or(defaults.storage_dir, PathBuf::from),
            storage_key: lookup("TODO_STORAGE_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(defaults.storage_key),
            id_scheme: parse_or(&lookup, "TODO_ID_SCHEME", defaults.id_scheme),
            recovery: parse_or(&lookup, "TODO_RECOVERY", defaults.recovery),
            reject_empty_input: parse_or(&lookup, "TODO_REJECT_EMPTY_INPUT", defaults.reject_empty_input),
            print_metrics: parse_or(&lookup, "TODO_PRINT_METRICS", defaults.print_metrics),
        }
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_recovery(self.recovery)
    }

    /// Set the storage directory
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Set the storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the id scheme
    #[must_use]
    pub const fn with_id_scheme(mut self, scheme: IdScheme) -> Self {
        self.id_scheme = scheme;
        self
    }

    /// Set the recovery policy
    #[must_use]
    pub const fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    /// Set whether blank submissions are ignored
    #[must_use]
    pub const fn with_reject_empty_input(mut self, reject: bool) -> Self {
        self.reject_empty_input = reject;
        self
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return default;
    };

    match raw.trim().to_ascii_lowercase().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparseable setting");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.storage_key, "todoAppKey");
        assert_eq!(config.storage_dir, PathBuf::from(".todo"));
        assert_eq!(config.id_scheme, IdScheme::Monotonic);
        assert_eq!(config.recovery, RecoveryPolicy::FallBackToDefault);
        assert!(!config.reject_empty_input);
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_STORAGE_DIR", "/tmp/todos"),
            ("TODO_STORAGE_KEY", "work"),
            ("TODO_ID_SCHEME", "random"),
            ("TODO_RECOVERY", "fail"),
            ("TODO_REJECT_EMPTY_INPUT", "TRUE"),
            ("TODO_PRINT_METRICS", "true"),
        ]));

        assert_eq!(config.storage_dir, PathBuf::from("/tmp/todos"));
        assert_eq!(config.storage_key, "work");
        assert_eq!(config.id_scheme, IdScheme::Random);
        assert_eq!(config.recovery, RecoveryPolicy::Fail);
        assert!(config.reject_empty_input);
        assert!(config.print_metrics);
        assert_eq!(config.store_config().recovery, RecoveryPolicy::Fail);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_STORAGE_KEY", "  "),
            ("TODO_ID_SCHEME", "uuid"),
            ("TODO_RECOVERY", "retry"),
            ("TODO_REJECT_EMPTY_INPUT", "yes"),
        ]));

        assert_eq!(config, Config::default());
    }

    #[test]
    fn builders_override() {
        let config = Config::default()
            .with_storage_dir("data")
            .with_storage_key("k")
            .with_id_scheme(IdScheme::Random)
            .with_recovery(RecoveryPolicy::Fail)
            .with_reject_empty_input(true);

        assert_eq!(config.storage_dir, PathBuf::from("data"));
        assert_eq!(config.storage_key, "k");
        assert_eq!(config.id_scheme, IdScheme::Random);
        assert_eq!(config.recovery, RecoveryPolicy::Fail);
        assert!(config.reject_empty_input);
    }
}
