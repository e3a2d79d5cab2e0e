//! Prometheus metrics for the store runtime.
//!
//! The store records its activity through the `metrics` facade; without an
//! installed recorder every call is a no-op. Hosts that want numbers install
//! the Prometheus recorder once and render the text exposition on demand:
//!
//! ```rust,no_run
//! use todo_engine_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! // ... send actions ...
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Actions reduced by a store
pub const ACTIONS_TOTAL: &str = "store_actions_total";
/// Time spent inside `Reducer::reduce`
pub const REDUCER_DURATION_SECONDS: &str = "store_reducer_duration_seconds";
/// Successful state writes
pub const PERSIST_TOTAL: &str = "store_persist_total";
/// Failed state writes
pub const PERSIST_FAILURES_TOTAL: &str = "store_persist_failures_total";
/// Hydrations that discarded a corrupt snapshot and started from default state
pub const HYDRATION_RECOVERED_TOTAL: &str = "store_hydration_recovered_total";

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installs the Prometheus recorder and renders what it collected.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe all store metrics and install the Prometheus recorder globally.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// Only one global recorder can exist per process. If one is already
    /// installed (e.g. by another test) this logs a warning and succeeds
    /// without a handle, so [`render`](Self::render) returns `None`.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this recorder was never installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions reduced by the store");
    describe_histogram!(REDUCER_DURATION_SECONDS, "Time taken to run the reducer for one action");
    describe_counter!(PERSIST_TOTAL, "Total number of successful state writes");
    describe_counter!(PERSIST_FAILURES_TOTAL, "Total number of failed state writes");
    describe_counter!(
        HYDRATION_RECOVERED_TOTAL,
        "Total number of corrupt snapshots discarded during hydration"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one reduced action.
    pub fn record_action(duration: Duration) {
        counter!(ACTIONS_TOTAL).increment(1);
        histogram!(REDUCER_DURATION_SECONDS).record(duration.as_secs_f64());
    }

    /// Record the outcome of a state write.
    pub fn record_persist(succeeded: bool) {
        if succeeded {
            counter!(PERSIST_TOTAL).increment(1);
        } else {
            counter!(PERSIST_FAILURES_TOTAL).increment(1);
        }
    }

    /// Record a hydration that fell back to the default state.
    pub fn record_hydration_recovered() {
        counter!(HYDRATION_RECOVERED_TOTAL).increment(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn recorder_starts_without_handle() {
        let recorder = MetricsRecorder::new();
        assert!(recorder.handle().is_none());
        assert!(recorder.render().is_none());
    }

    #[test]
    fn install_and_render() {
        let mut recorder = MetricsRecorder::new();
        recorder.install().unwrap();

        StoreMetrics::record_action(Duration::from_micros(20));
        StoreMetrics::record_persist(true);
        StoreMetrics::record_persist(false);

        // Another test may have installed the global recorder first.
        if let Some(rendered) = recorder.render() {
            assert!(rendered.contains(ACTIONS_TOTAL));
            assert!(rendered.contains(PERSIST_FAILURES_TOTAL));
        }
    }
}
