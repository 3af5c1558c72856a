//! Configuration source trait.

use crate::error::Result;
use std::collections::HashMap;

/// Trait for configuration sources.
///
/// A source yields a flat key/value map with lower-cased keys. The loader merges
/// every source in priority order before deserializing the settings.
pub trait ConfigSource {
    /// Load configuration as a raw key-value map.
    ///
    /// # Errors
    ///
    /// Returns an error if the source exists but cannot be read or parsed.
    fn load(&self) -> Result<HashMap<String, config::Value>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = takes precedence).
    ///
    /// Default priorities:
    /// - Process environment: 300
    /// - `.env` file: 100
    fn priority(&self) -> i32 {
        100
    }
}

/// Whether `name` is one of the variables a source was asked to read.
pub(crate) fn is_known_key(keys: &[String], name: &str) -> bool {
    keys.iter().any(|key| key.eq_ignore_ascii_case(name))
}
