//! Built-in metrics for the poll loop.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Cycles run and cycles failed
//! - Cycle duration
//! - Notifications sent and sends failed
//! - Current checkpoint
//!
//! # Examples
//!
//! ```rust,no_run
//! use homework_relay::metrics::RelayMetrics;
//! use opentelemetry::global;
//!
//! let metrics = RelayMetrics::new(global::meter("homework-relay"));
//! let timer = metrics.start_cycle();
//! // ... poll, diff, notify ...
//! metrics.record_cycle_success(timer, 2);
//! ```

mod relay_metrics;

pub use relay_metrics::RelayMetrics;
