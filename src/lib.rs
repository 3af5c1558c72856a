//! # homework-relay
//!
//! Polls the Practicum homework statuses API and relays review status changes to a
//! Telegram chat.
//!
//! ## Overview
//!
//! Every cycle the relay:
//! - Fetches the statuses changed since its checkpoint
//! - Validates the response into typed records
//! - Notifies the chat about every record whose status differs from the last one sent
//! - Advances the checkpoint once the whole page went through
//! - Sleeps for the poll interval
//!
//! Any failure inside a cycle is logged, reported to the chat once and retried on the
//! next cycle from the same checkpoint.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use homework_relay::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let settings = RelaySettings::load()?;
//!
//! let api = PracticumClient::builder()
//!     .with_url(&settings.endpoint)
//!     .with_token(&settings.practicum_token)
//!     .with_timeout(settings.request_timeout)
//!     .build()?;
//! let bot = TelegramMessenger::builder()
//!     .with_token(&settings.telegram_token)
//!     .with_chat_id(&settings.telegram_chat_id)
//!     .build()?;
//!
//! Relay::new(api, bot)
//!     .with_interval(settings.poll_interval)
//!     .run();
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `metrics`: OpenTelemetry counters for cycles and notifications
//!   ([`metrics::RelayMetrics`])

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod messenger;
pub mod relay;
pub mod sources;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(test)]
mod test_server;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::api::{HomeworkApi, PracticumClient};
    pub use crate::config::RelaySettings;
    pub use crate::error::{RelayError, Result, ValidationError};
    pub use crate::messenger::{Messenger, TelegramMessenger};
    pub use crate::relay::{Checkpoint, Relay};
}
