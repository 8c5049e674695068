//! Client-side preference storage.
//!
//! The site persists exactly one value (the active locale) under a fixed key.
//! `MemoryStore` stands in for a fresh browser profile; `FileStore` keeps the
//! pairs in a small JSON object on disk so preferences survive across runs.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value storage for user preferences.
pub trait PreferenceStore {
    /// Read the value stored under `key`; `Ok(None)` when absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store; starts empty unless seeded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `key = value`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences in {}", self.path.display()))
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))?;

        debug!("Saved preference {}={} to {}", key, value, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== MemoryStore Tests ====================

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.load("rafe_language").unwrap(), None);
    }

    #[test]
    fn test_memory_store_save_overwrites() {
        let mut store = MemoryStore::with_value("rafe_language", "ar");
        store.save("rafe_language", "en").unwrap();
        assert_eq!(store.load("rafe_language").unwrap(), Some("en".to_string()));
    }

    // ==================== FileStore Tests ====================

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.load("rafe_language").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_between_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        FileStore::new(&path).save("rafe_language", "ar").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load("rafe_language").unwrap(), Some("ar".to_string()));
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut store = FileStore::new(&path);
        store.save("rafe_language", "en").unwrap();

        assert_eq!(store.load("theme").unwrap(), Some("dark".to_string()));
        assert_eq!(store.load("rafe_language").unwrap(), Some("en".to_string()));
    }

    #[test]
    fn test_file_store_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        let err = store.load("rafe_language").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
