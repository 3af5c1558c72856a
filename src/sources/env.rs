//! Environment variable configuration source.

use super::ConfigSource;
use super::config_source::is_known_key;
use crate::error::{RelayError, Result};
use config::Environment;
use std::collections::HashMap;

/// Environment variable configuration source.
///
/// Reads an explicit allow-list of variables from the process environment.
/// Names are matched case-insensitively and surface as lower-cased keys
/// (`TELEGRAM_TOKEN` -> `telegram_token`). Values are kept as strings; the
/// settings layer does its own parsing.
///
/// # Examples
///
/// ```rust
/// use homework_relay::sources::EnvSource;
///
/// let source = EnvSource::new(["PRACTICUM_TOKEN", "TELEGRAM_TOKEN"]);
/// ```
pub struct EnvSource {
    keys: Vec<String>,
    vars: Option<HashMap<String, String>>,
    priority: i32,
}

impl EnvSource {
    /// Create a source reading the given variable names.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            vars: None,
            priority: 300, // Env vars have highest priority by default
        }
    }

    /// Read from a fixed map instead of the process environment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use homework_relay::sources::EnvSource;
    /// use std::collections::HashMap;
    ///
    /// let vars = HashMap::from([("TELEGRAM_CHAT_ID".to_string(), "42".to_string())]);
    /// let source = EnvSource::new(["TELEGRAM_CHAT_ID"]).with_vars(vars);
    /// ```
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn snapshot(&self) -> config::Map<String, String> {
        let vars: Box<dyn Iterator<Item = (String, String)>> = match &self.vars {
            Some(vars) => Box::new(vars.clone().into_iter()),
            // Non-UTF-8 variables cannot be ours; skip instead of panicking.
            None => Box::new(
                std::env::vars_os()
                    .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
            ),
        };

        vars.filter(|(name, _)| is_known_key(&self.keys, name))
            .collect()
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let env_source = Environment::default()
            .source(Some(self.snapshot()))
            .try_parsing(false);

        let config = config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| {
                RelayError::LoadError(format!("Failed to load environment variables: {}", e))
            })?;

        config
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                RelayError::LoadError(format!("Failed to parse environment variables: {}", e))
            })
    }

    fn name(&self) -> String {
        "env".to_string()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
