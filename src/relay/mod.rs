//! Poll-notify loop and the state it owns.

mod message;
mod poller;
mod report;
mod state;

pub use message::{MAX_MESSAGE_CHARS, failure_message, status_message};
pub use poller::{CycleReport, Relay};
pub use report::FailureReporter;
pub use state::{Checkpoint, LastSeen};
