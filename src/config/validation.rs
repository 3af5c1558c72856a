//! Settings validation support.

use crate::error::ValidationError;

/// Trait for validating loaded values before they are used.
///
/// # Examples
///
/// ```rust
/// use homework_relay::config::Validate;
/// use homework_relay::error::ValidationError;
/// use std::time::Duration;
///
/// struct PollSettings {
///     interval: Duration,
/// }
///
/// impl Validate for PollSettings {
///     fn validate(&self) -> Result<(), ValidationError> {
///         if self.interval.is_zero() {
///             return Err(ValidationError::invalid_field(
///                 "interval",
///                 "must be greater than 0",
///             ));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validate {
    /// Validate the value.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}
