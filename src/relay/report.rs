//! Deduplicated failure reports.

use super::message::failure_message;
use crate::error::RelayError;
use crate::messenger::Messenger;

/// Sends `Bot failure: ...` messages, at most once per consecutive error text.
#[derive(Debug, Clone, Default)]
pub struct FailureReporter {
    enabled: bool,
    last_reported: Option<String>,
}

impl FailureReporter {
    /// Reporter that sends when `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_reported: None,
        }
    }

    /// Report `error` unless the same text was the last thing reported.
    ///
    /// Returns whether a message went out. Delivery problems are logged and the
    /// text is not remembered, so the next failure tries again.
    pub fn report<M: Messenger>(&mut self, messenger: &M, error: &RelayError) -> bool {
        if !self.enabled {
            return false;
        }

        let text = failure_message(error);
        if self.last_reported.as_deref() == Some(text.as_str()) {
            tracing::debug!("failure already reported, not repeating it");
            return false;
        }

        match messenger.send(&text) {
            Ok(()) => {
                self.last_reported = Some(text);
                true
            }
            Err(send_error) => {
                tracing::warn!(
                    messenger = %messenger.name(),
                    error = %send_error,
                    "could not report failure"
                );
                false
            }
        }
    }

    /// Forget the last report after a healthy cycle.
    pub fn reset(&mut self) {
        self.last_reported = None;
    }

    /// Text of the last delivered report.
    pub fn last_reported(&self) -> Option<&str> {
        self.last_reported.as_deref()
    }
}
