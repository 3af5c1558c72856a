//! Error types for homework-relay.

use std::fmt;

/// Result type alias for homework-relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur while configuring or running the relay.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// One or more required environment variables are absent or blank.
    #[error("Missing required environment variables: {}", .names.join(", "))]
    MissingCredentials {
        /// Names of the missing variables, in declaration order
        names: Vec<&'static str>,
    },

    /// A configuration value is present but unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load configuration from a source.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// The HTTP request could not be completed (connect, timeout, body read).
    #[error("{api} request failed: {details}")]
    Request {
        /// Which remote API was being called
        api: &'static str,
        /// Transport error description
        details: String,
    },

    /// The remote API answered with a non-success status code.
    #[error("{api} returned unexpected status {status}: {body}")]
    HttpStatus {
        /// Which remote API was being called
        api: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The remote API answered with a body that does not match the expected shape.
    #[error("{api} returned an invalid response: {source}")]
    InvalidResponse {
        /// Which remote API was being called
        api: &'static str,
        /// What was expected versus what was received
        #[source]
        source: ValidationError,
    },

    /// The messaging API refused or failed to deliver a message.
    #[error("Failed to deliver message: {0}")]
    Delivery(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RelayError {
    /// Convenience constructor for shape errors.
    pub fn invalid_response(api: &'static str, source: ValidationError) -> Self {
        Self::InvalidResponse { api, source }
    }
}

/// Longest response body kept in an error message.
const MAX_BODY_CHARS: usize = 200;

/// Shorten a response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Validation error for API responses and settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A required field is absent.
    MissingField {
        /// The field name/path
        field: String,
    },

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name/path
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Move a single-field error to `field`, keeping its reason.
    ///
    /// `Custom` and `Multiple` errors carry no field and are returned as is.
    #[must_use]
    pub fn at(self, field: impl Into<String>) -> Self {
        match self {
            Self::MissingField { .. } => Self::missing_field(field),
            Self::InvalidField { reason, .. } => Self::invalid_field(field, reason),
            other => other,
        }
    }

    /// Collapse a list of errors, returning `Ok` when it is empty.
    pub fn from_list(mut errors: Vec<ValidationError>) -> std::result::Result<(), Self> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::MissingField { field } => write!(f, "Field '{}' is missing", field),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for RelayError {
    fn from(err: ValidationError) -> Self {
        RelayError::InvalidConfig(err.to_string())
    }
}
