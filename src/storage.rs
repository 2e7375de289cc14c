//! Preference storage
//!
//! The client persists exactly two values between runs: the API key and the
//! base URL of the endpoint. Storage sits behind the [`PreferenceStore`]
//! trait so applications can plug in their own backend; an in-memory store
//! and a JSON-file store are provided.

use secrecy::SecretString;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::{ChatError, Result};

/// Key under which the API key is stored.
pub const API_KEY: &str = "api_key";
/// Key under which the endpoint base URL is stored.
pub const BASE_URL: &str = "base_url";

/// Minimal string key-value store.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }
}

/// Process-local store; values are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| ChatError::Storage("preference lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| ChatError::Storage("preference lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// The file is re-read on every access so several handles may share it.
/// Writes go to a sibling temporary file that is then renamed over the
/// existing file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferenceStore {
    /// Use `path` as the backing file. It is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            ChatError::Storage(format!(
                "corrupt preference file {}: {e}",
                self.path.display()
            ))
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let encoded = serde_json::to_string_pretty(values)
            .map_err(|e| ChatError::Storage(format!("failed to encode preferences: {e}")))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, encoded)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ChatError::Storage("preference lock poisoned".to_string()))?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;
        tracing::debug!(target: "chatstream::storage", key, path = %self.path.display(), "preference saved");
        Ok(())
    }
}

/// Typed access to the API key and base URL held by a [`PreferenceStore`].
#[derive(Debug)]
pub struct Credentials<S> {
    store: S,
}

impl<S: PreferenceStore> Credentials<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored API key; blank values count as absent.
    pub fn api_key(&self) -> Result<Option<SecretString>> {
        Ok(self.non_blank(API_KEY)?.map(SecretString::from))
    }

    pub fn store_api_key(&self, api_key: &str) -> Result<()> {
        self.store.put(API_KEY, api_key.trim())
    }

    /// Stored base URL; blank values count as absent.
    pub fn base_url(&self) -> Result<Option<String>> {
        self.non_blank(BASE_URL)
    }

    pub fn store_base_url(&self, base_url: &str) -> Result<()> {
        self.store.put(BASE_URL, base_url.trim())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn non_blank(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get(key)?.filter(|v| !v.trim().is_empty()))
    }
}
