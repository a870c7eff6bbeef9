//! Key/value preference storage persisted as a single JSON file

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

pub const FAVORITES_KEY: &str = "movieAppFavorites";
pub const WATCH_LATER_KEY: &str = "movieAppWatchLater";
pub const THEME_KEY: &str = "movieAppTheme";
pub const LANGUAGE_KEY: &str = "movieAppLanguage";

/// String-to-string store, written through to disk on every change.
///
/// Structured values are stored JSON-encoded under their key, so each key
/// can be read, replaced, or corrupted independently of the others.
#[derive(Clone)]
pub struct PreferenceStore {
    path: Option<Arc<PathBuf>>,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl PreferenceStore {
    /// Store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Open (or start) the store at `path`. An unreadable or corrupt file
    /// starts the store empty rather than failing.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: Some(Arc::new(path.into())),
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        };
        if let Err(e) = store.load_from_disk().await {
            tracing::warn!(error = %e, "Could not read preferences, starting empty");
        }
        store
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    async fn load_from_disk(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };

        if path.exists() {
            let content = fs::read_to_string(path)?;
            let loaded: BTreeMap<String, String> = serde_json::from_str(&content)?;
            tracing::debug!(keys = loaded.len(), path = %path.display(), "Loaded preferences");
            *self.entries.write().await = loaded;
        }
        Ok(())
    }

    fn save_to_disk(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Replace `key` and persist before returning.
    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.into());
        self.save_to_disk(&entries)
    }

    /// Decode a JSON value stored under `key`. Absent or undecodable
    /// values both read as `None`; the latter is logged.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring corrupt stored value");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.set(key, encoded).await
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = PreferenceStore::open(&path).await;
        store.set(LANGUAGE_KEY, "fr").await.unwrap();
        store.set_json(FAVORITES_KEY, &vec!["a", "b"]).await.unwrap();

        let reopened = PreferenceStore::open(&path).await;
        assert_eq!(reopened.get(LANGUAGE_KEY).await.as_deref(), Some("fr"));
        assert_eq!(
            reopened.get_json::<Vec<String>>(FAVORITES_KEY).await,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{{{{").unwrap();

        let store = PreferenceStore::open(&path).await;
        assert_eq!(store.get(THEME_KEY).await, None);

        // The next write replaces the broken file
        store.set(THEME_KEY, "light").await.unwrap();
        let reopened = PreferenceStore::open(&path).await;
        assert_eq!(reopened.get(THEME_KEY).await.as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn corrupt_value_reads_as_absent() {
        let store = PreferenceStore::in_memory();
        store.set(WATCH_LATER_KEY, "[not json").await.unwrap();
        assert_eq!(store.get_json::<Vec<String>>(WATCH_LATER_KEY).await, None);
    }
}
