//! Relay metrics tracking using OpenTelemetry.

use crate::relay::Checkpoint;
use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use std::sync::Arc;
use std::time::Instant;

/// Metrics collector for the poll loop.
///
/// # Examples
///
/// ```rust,no_run
/// use homework_relay::metrics::RelayMetrics;
/// use opentelemetry::global;
///
/// let metrics = RelayMetrics::new(global::meter("homework-relay"));
/// let timer = metrics.start_cycle();
/// metrics.record_cycle_failure(timer);
/// ```
#[derive(Clone)]
pub struct RelayMetrics {
    cycles: Counter<u64>,
    cycle_failures: Counter<u64>,
    cycle_duration: Histogram<f64>,
    notifications_sent: Counter<u64>,
    send_failures: Counter<u64>,
    checkpoint: Gauge<i64>,
    last_success: Arc<parking_lot::Mutex<Option<Instant>>>,
}

impl RelayMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let cycles = meter
            .u64_counter("homework_relay.cycles")
            .with_description("Total number of poll cycles")
            .build();

        let cycle_failures = meter
            .u64_counter("homework_relay.cycles.failures")
            .with_description("Number of poll cycles that ended in an error")
            .build();

        let cycle_duration = meter
            .f64_histogram("homework_relay.cycle.duration")
            .with_description("Duration of poll cycles in seconds")
            .with_unit("s")
            .build();

        let notifications_sent = meter
            .u64_counter("homework_relay.notifications.sent")
            .with_description("Status change notifications delivered")
            .build();

        let send_failures = meter
            .u64_counter("homework_relay.notifications.failures")
            .with_description("Status change notifications that could not be delivered")
            .build();

        let checkpoint = meter
            .i64_gauge("homework_relay.checkpoint")
            .with_description("Current fetch checkpoint in seconds since the epoch")
            .with_unit("s")
            .build();

        Self {
            cycles,
            cycle_failures,
            cycle_duration,
            notifications_sent,
            send_failures,
            checkpoint,
            last_success: Arc::new(parking_lot::Mutex::new(None)),
        }
    }

    /// Start a cycle timer.
    ///
    /// Pass the returned `Instant` to `record_cycle_success` or
    /// `record_cycle_failure` when the cycle ends.
    pub fn start_cycle(&self) -> Instant {
        self.cycles.add(1, &[]);
        Instant::now()
    }

    /// Record a cycle that completed and delivered `notified` messages.
    pub fn record_cycle_success(&self, start: Instant, notified: usize) {
        self.cycle_duration.record(start.elapsed().as_secs_f64(), &[]);
        self.notifications_sent.add(notified as u64, &[]);
        *self.last_success.lock() = Some(Instant::now());
    }

    /// Record a cycle that ended in an error.
    pub fn record_cycle_failure(&self, start: Instant) {
        self.cycle_duration.record(start.elapsed().as_secs_f64(), &[]);
        self.cycle_failures.add(1, &[]);
    }

    /// Record one notification that could not be delivered.
    pub fn record_send_failure(&self) {
        self.send_failures.add(1, &[]);
    }

    /// Publish the checkpoint the loop will fetch from next.
    pub fn update_checkpoint(&self, checkpoint: Checkpoint) {
        self.checkpoint.record(checkpoint.as_secs(), &[]);
    }

    /// Time since the last successful cycle, if there was one.
    pub fn since_last_success(&self) -> Option<std::time::Duration> {
        self.last_success.lock().map(|at| at.elapsed())
    }
}
