//! Configuration loader that merges multiple sources.

use crate::error::{RelayError, Result};
use crate::sources::ConfigSource;
use serde::de::DeserializeOwned;

/// Loads and merges configuration from multiple sources.
///
/// Sources are sorted by priority and merged in order (lower priority first,
/// higher priority sources override).
pub struct ConfigLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a configuration source.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Add a configuration source, builder style.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.add_source(Box::new(source));
        self
    }

    /// Load and merge configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source was added
    /// - Any source fails to load
    /// - Deserialization fails
    pub fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if self.sources.is_empty() {
            return Err(RelayError::LoadError(
                "No configuration sources specified".to_string(),
            ));
        }

        let mut builder = config::Config::builder();

        for source in self.sorted() {
            let values = source.load().map_err(|e| {
                RelayError::LoadError(format!("Failed to load source '{}': {}", source.name(), e))
            })?;
            tracing::trace!(
                source = %source.name(),
                keys = values.len(),
                "merging configuration source"
            );

            for (key, value) in values {
                builder = builder.set_override(&key, value).map_err(|e| {
                    RelayError::LoadError(format!(
                        "Failed to merge source '{}': {}",
                        source.name(),
                        e
                    ))
                })?;
            }
        }

        let config = builder
            .build()
            .map_err(|e| RelayError::LoadError(format!("Failed to build configuration: {}", e)))?;

        config.try_deserialize::<T>().map_err(|e| {
            RelayError::LoadError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted().iter().map(|s| s.name()).collect()
    }

    fn sorted(&self) -> Vec<&dyn ConfigSource> {
        let mut sorted: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| &**s).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
