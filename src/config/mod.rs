//! Settings loading and validation.

mod loader;
mod settings;
mod validation;

pub use loader::ConfigLoader;
pub use settings::{
    DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TELEGRAM_API_URL,
    KNOWN_VARIABLES, REQUIRED_VARIABLES, RelaySettings,
};
pub use validation::Validate;
