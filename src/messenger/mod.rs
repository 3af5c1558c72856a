//! Outgoing chat messages.

mod telegram;

pub use telegram::{TelegramMessenger, TelegramMessengerBuilder};

use crate::error::Result;

/// Destination for notification text.
///
/// Implemented by [`TelegramMessenger`]; tests substitute in-memory fakes.
pub trait Messenger {
    /// Deliver `text` to the configured chat.
    ///
    /// # Errors
    ///
    /// Returns an error when the message was not accepted. Callers treat this
    /// as a recoverable failure.
    fn send(&self, text: &str) -> Result<()>;

    /// Get a human-readable name for this messenger (for logging/debugging).
    fn name(&self) -> String;
}
