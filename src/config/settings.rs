//! Relay settings sourced from the environment.

use super::{ConfigLoader, Validate};
use crate::error::{RelayError, Result, ValidationError};
use crate::sources::{DotenvSource, EnvSource};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default homework statuses endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default pause between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(600);

/// Default timeout for a single outbound HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Variables that must be present and non-blank for the relay to start.
pub const REQUIRED_VARIABLES: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Every variable the relay reads.
pub const KNOWN_VARIABLES: [&str; 9] = [
    "PRACTICUM_TOKEN",
    "TELEGRAM_TOKEN",
    "TELEGRAM_CHAT_ID",
    "RELAY_POLL_INTERVAL_SECS",
    "RELAY_REQUEST_TIMEOUT_SECS",
    "RELAY_ENDPOINT",
    "RELAY_TELEGRAM_API_URL",
    "RELAY_LOG_FILE",
    "RELAY_REPORT_ERRORS",
];

/// Merged, not yet validated view of the variables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    practicum_token: Option<String>,
    telegram_token: Option<String>,
    telegram_chat_id: Option<String>,
    relay_poll_interval_secs: Option<u64>,
    relay_request_timeout_secs: Option<u64>,
    relay_endpoint: Option<String>,
    relay_telegram_api_url: Option<String>,
    relay_log_file: Option<PathBuf>,
    relay_report_errors: Option<bool>,
}

/// Everything the relay needs to run.
///
/// The `Debug` output redacts both tokens.
///
/// # Examples
///
/// ```rust,no_run
/// use homework_relay::config::RelaySettings;
///
/// # fn example() -> homework_relay::error::Result<()> {
/// let settings = RelaySettings::load()?;
/// println!("polling every {:?}", settings.poll_interval);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RelaySettings {
    /// OAuth token for the homework statuses API.
    pub practicum_token: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Chat that receives notifications.
    pub telegram_chat_id: String,
    /// Pause between poll cycles.
    pub poll_interval: Duration,
    /// Timeout for each outbound HTTP request.
    pub request_timeout: Duration,
    /// Homework statuses endpoint.
    pub endpoint: String,
    /// Telegram Bot API base URL.
    pub telegram_api_url: String,
    /// Optional file that receives a copy of the log.
    pub log_file: Option<PathBuf>,
    /// Whether failed cycles are reported to the chat.
    pub report_errors: bool,
}

impl RelaySettings {
    /// Load settings from `./.env` and the process environment (which wins).
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MissingCredentials`] when any required variable is
    /// absent or blank, and [`RelayError::InvalidConfig`] or
    /// [`RelayError::LoadError`] for unusable optional values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_loader())
    }

    /// The loader used by [`RelaySettings::load`].
    pub fn default_loader() -> ConfigLoader {
        ConfigLoader::new()
            .with_source(DotenvSource::new(".env", KNOWN_VARIABLES))
            .with_source(EnvSource::new(KNOWN_VARIABLES))
    }

    /// Load settings from an explicit set of sources.
    ///
    /// # Errors
    ///
    /// Same as [`RelaySettings::load`].
    pub fn load_from(loader: &ConfigLoader) -> Result<Self> {
        let raw: RawSettings = loader.load()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let required = [
            (REQUIRED_VARIABLES[0], &raw.practicum_token),
            (REQUIRED_VARIABLES[1], &raw.telegram_token),
            (REQUIRED_VARIABLES[2], &raw.telegram_chat_id),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(RelayError::MissingCredentials { names: missing });
        }

        let settings = Self {
            practicum_token: raw.practicum_token.unwrap_or_default().trim().to_string(),
            telegram_token: raw.telegram_token.unwrap_or_default().trim().to_string(),
            telegram_chat_id: raw.telegram_chat_id.unwrap_or_default().trim().to_string(),
            poll_interval: raw
                .relay_poll_interval_secs
                .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs),
            request_timeout: raw
                .relay_request_timeout_secs
                .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
            endpoint: raw
                .relay_endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: raw
                .relay_telegram_api_url
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            log_file: raw.relay_log_file.filter(|p| !p.as_os_str().is_empty()),
            report_errors: raw.relay_report_errors.unwrap_or(true),
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn check_url(field: &str, value: &str) -> Option<ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        None
    } else {
        Some(ValidationError::invalid_field(
            field,
            format!("'{}' is not an http(s) URL", value),
        ))
    }
}

impl Validate for RelaySettings {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.poll_interval.is_zero() {
            errors.push(ValidationError::invalid_field(
                "RELAY_POLL_INTERVAL_SECS",
                "must be greater than 0",
            ));
        }
        if self.request_timeout.is_zero() {
            errors.push(ValidationError::invalid_field(
                "RELAY_REQUEST_TIMEOUT_SECS",
                "must be greater than 0",
            ));
        }
        errors.extend(check_url("RELAY_ENDPOINT", &self.endpoint));
        errors.extend(check_url("RELAY_TELEGRAM_API_URL", &self.telegram_api_url));
        ValidationError::from_list(errors)
    }
}

impl fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySettings")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("log_file", &self.log_file)
            .field("report_errors", &self.report_errors)
            .finish()
    }
}
