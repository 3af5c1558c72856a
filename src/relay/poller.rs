//! The poll → diff → notify → sleep loop.

use super::message::status_message;
use super::report::FailureReporter;
use super::state::{Checkpoint, LastSeen};
use crate::api::HomeworkApi;
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::error::{RelayError, Result};
use crate::messenger::Messenger;
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::metrics::RelayMetrics;

/// Outcome of one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Records returned by the statuses API.
    pub fetched: usize,
    /// Notifications delivered.
    pub notified: usize,
}

/// Polls a [`HomeworkApi`] and relays status changes through a [`Messenger`].
///
/// Owns the checkpoint and the last-seen map; nothing else mutates them.
///
/// # Examples
///
/// ```rust,no_run
/// use homework_relay::api::PracticumClient;
/// use homework_relay::messenger::TelegramMessenger;
/// use homework_relay::relay::Relay;
/// use std::time::Duration;
///
/// # fn example() -> homework_relay::error::Result<()> {
/// let api = PracticumClient::builder().with_token("y0_token").build()?;
/// let bot = TelegramMessenger::builder()
///     .with_token("123:abc")
///     .with_chat_id("42")
///     .build()?;
///
/// Relay::new(api, bot)
///     .with_interval(Duration::from_secs(600))
///     .run();
/// # }
/// ```
pub struct Relay<A, M> {
    api: A,
    messenger: M,
    interval: Duration,
    checkpoint: Checkpoint,
    last_seen: LastSeen,
    reporter: FailureReporter,
    #[cfg(feature = "metrics")]
    metrics: Option<RelayMetrics>,
}

impl<A: HomeworkApi, M: Messenger> Relay<A, M> {
    /// Create a relay starting from the current time.
    pub fn new(api: A, messenger: M) -> Self {
        Self {
            api,
            messenger,
            interval: DEFAULT_POLL_INTERVAL,
            checkpoint: Checkpoint::now(),
            last_seen: LastSeen::new(),
            reporter: FailureReporter::new(true),
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Set the pause between cycles.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start fetching from `checkpoint` instead of now.
    pub fn with_checkpoint(mut self, checkpoint: Checkpoint) -> Self {
        self.checkpoint = checkpoint;
        self
    }

    /// Enable or disable failure reports to the chat.
    pub fn with_failure_reports(mut self, enabled: bool) -> Self {
        self.reporter = FailureReporter::new(enabled);
        self
    }

    /// Attach a metrics collector.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: RelayMetrics) -> Self {
        metrics.update_checkpoint(self.checkpoint);
        self.metrics = Some(metrics);
        self
    }

    /// Checkpoint the next cycle fetches from.
    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint
    }

    /// Statuses notified so far.
    pub fn last_seen(&self) -> &LastSeen {
        &self.last_seen
    }

    /// Pause between cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The statuses API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The messenger.
    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Run forever: one cycle, then sleep for the interval.
    pub fn run(mut self) -> ! {
        tracing::info!(
            api = %self.api.name(),
            messenger = %self.messenger.name(),
            interval_secs = self.interval.as_secs(),
            checkpoint = %self.checkpoint,
            "relay started"
        );
        loop {
            // Failures are logged and reported inside; the loop only paces.
            let _ = self.run_cycle();
            std::thread::sleep(self.interval);
        }
    }

    /// Run one cycle, absorbing its failure.
    ///
    /// A failed cycle is logged, reported to the chat (once per distinct error
    /// text) and leaves the checkpoint where it was. The result is returned for
    /// inspection only; the loop never stops on it.
    pub fn run_cycle(&mut self) -> Result<CycleReport> {
        #[cfg(feature = "metrics")]
        let timer = self.metrics.as_ref().map(|m| m.start_cycle());

        let outcome = self.poll();

        match &outcome {
            Ok(report) => {
                self.reporter.reset();
                #[cfg(feature = "metrics")]
                if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
                    metrics.record_cycle_success(timer, report.notified);
                    metrics.update_checkpoint(self.checkpoint);
                }
                tracing::debug!(
                    fetched = report.fetched,
                    notified = report.notified,
                    "cycle complete"
                );
            }
            Err(error) => {
                tracing::error!(checkpoint = %self.checkpoint, "cycle failed: {}", error);
                #[cfg(feature = "metrics")]
                if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
                    metrics.record_cycle_failure(timer);
                    if let Some(stalled) = metrics.since_last_success() {
                        tracing::warn!(
                            stalled_secs = stalled.as_secs(),
                            "time since the last successful cycle"
                        );
                    }
                }
                self.reporter.report(&self.messenger, error);
            }
        }

        outcome
    }

    /// Fetch, validate, diff, notify, then advance the checkpoint.
    fn poll(&mut self) -> Result<CycleReport> {
        let page = self.api.fetch(self.checkpoint)?;

        if page.homeworks.is_empty() {
            tracing::debug!("no new statuses");
        }

        let mut notified = 0;
        let mut failures = Vec::new();
        for homework in &page.homeworks {
            if !self.last_seen.is_changed(homework) {
                tracing::debug!(id = homework.id, status = %homework.status, "status unchanged");
                continue;
            }

            match self.messenger.send(&status_message(homework)) {
                Ok(()) => {
                    self.last_seen.record(homework.id, homework.status);
                    notified += 1;
                }
                Err(error) => {
                    tracing::error!(
                        id = homework.id,
                        status = %homework.status,
                        messenger = %self.messenger.name(),
                        "notification not delivered: {}",
                        error
                    );
                    #[cfg(feature = "metrics")]
                    if let Some(metrics) = &self.metrics {
                        metrics.record_send_failure();
                    }
                    failures.push(error);
                }
            }
        }

        match failures.len() {
            0 => {}
            1 => return Err(failures.remove(0)),
            n => {
                return Err(RelayError::Delivery(format!(
                    "{} notifications not delivered, first error: {}",
                    n, failures[0]
                )));
            }
        }

        if page.current_date != self.checkpoint {
            tracing::info!(from = %self.checkpoint, to = %page.current_date, "checkpoint advanced");
        }
        self.checkpoint = page.current_date;

        Ok(CycleReport {
            fetched: page.homeworks.len(),
            notified,
        })
    }
}
