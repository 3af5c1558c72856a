//! `.env` file configuration source.

use super::ConfigSource;
use super::config_source::is_known_key;
use crate::error::{RelayError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// `.env` file configuration source.
///
/// Parses `KEY=value` lines with `dotenvy` without touching the process
/// environment, keeping only the allow-listed names. A missing file is not an
/// error: it simply contributes nothing.
///
/// # Examples
///
/// ```rust,no_run
/// use homework_relay::sources::DotenvSource;
///
/// let source = DotenvSource::new(".env", ["TELEGRAM_TOKEN"]);
/// ```
pub struct DotenvSource {
    path: PathBuf,
    keys: Vec<String>,
    priority: i32,
}

impl DotenvSource {
    /// Create a source reading the given variable names from `path`.
    pub fn new<I, S>(path: impl Into<PathBuf>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            priority: 100,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for DotenvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let mut map = HashMap::new();
        if !self.path.exists() {
            return Ok(map);
        }

        let origin = self.path.display().to_string();
        let entries = dotenvy::from_path_iter(&self.path).map_err(|e| {
            RelayError::LoadError(format!("Failed to open {}: {}", origin, e))
        })?;

        for entry in entries {
            let (name, value) = entry.map_err(|e| {
                RelayError::LoadError(format!("Failed to parse {}: {}", origin, e))
            })?;
            if is_known_key(&self.keys, &name) {
                map.insert(
                    name.to_lowercase(),
                    config::Value::new(Some(&origin), config::ValueKind::String(value)),
                );
            }
        }

        Ok(map)
    }

    fn name(&self) -> String {
        format!("dotenv:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let source = DotenvSource::new(temp_dir.path().join(".env"), ["TELEGRAM_TOKEN"]);
        assert!(source.load().unwrap().is_empty());
    }

    #[test]
    fn test_reads_known_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        fs::write(
            &path,
            "# bot credentials\nTELEGRAM_TOKEN=123:abc\nUNRELATED=1\nTELEGRAM_CHAT_ID=\"42\"\n",
        )
        .unwrap();

        let source = DotenvSource::new(&path, ["TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"]);
        let map = source.load().unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(
            map["telegram_token"].clone().into_string().unwrap(),
            "123:abc"
        );
        assert_eq!(map["telegram_chat_id"].clone().into_string().unwrap(), "42");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        fs::write(&path, "TELEGRAM_TOKEN 123:abc\n").unwrap();

        let source = DotenvSource::new(&path, ["TELEGRAM_TOKEN"]);
        assert!(matches!(source.load(), Err(RelayError::LoadError(_))));
    }

    #[test]
    fn test_name_and_priority() {
        let source = DotenvSource::new(".env", ["A"]).with_priority(150);
        assert_eq!(source.name(), "dotenv:.env");
        assert_eq!(source.priority(), 150);
    }
}
