//! Two-tier key/value preference storage with an in-memory last resort.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use wikiseek_core::{WikiEndpoint, PREFERENCE_KEY};
use wikiseek_logging::{seek_debug, seek_warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed storage file: {0}")]
    Format(String),
}

/// One persistence mechanism. `Ok(None)` means reachable but unset.
pub trait StorageTier: Send {
    fn name(&self) -> &'static str;
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Primary tier: a RON map in the user's profile directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match read_optional(&self.path)? {
            None => Ok(BTreeMap::new()),
            Some(text) => ron::from_str(&text).map_err(|err| StorageError::Format(err.to_string())),
        }
    }
}

impl StorageTier for ProfileStore {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        let content = ron::ser::to_string_pretty(&map, ron::ser::PrettyConfig::new())
            .map_err(|err| StorageError::Format(err.to_string()))?;
        write_atomically(&self.path, &content)
    }
}

/// Fallback tier: a JSON map next to the binary, one JSON value per key.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<serde_json::Map<String, serde_json::Value>, StorageError> {
        match read_optional(&self.path)? {
            None => Ok(serde_json::Map::new()),
            Some(text) => {
                serde_json::from_str(&text).map_err(|err| StorageError::Format(err.to_string()))
            }
        }
    }
}

impl StorageTier for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.load()?.remove(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(value)) => Ok(Some(value)),
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        let content = serde_json::to_string_pretty(&map)
            .map_err(|err| StorageError::Format(err.to_string()))?;
        write_atomically(&self.path, &content)
    }
}

/// Session-only values; never fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl StorageTier for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Best-effort preference storage. Reads and writes never report errors.
pub struct PreferenceStore {
    tiers: Vec<Box<dyn StorageTier>>,
    memory: MemoryStore,
}

impl PreferenceStore {
    /// Tiers are consulted in order; absent tiers are skipped.
    pub fn new(primary: Option<Box<dyn StorageTier>>, fallback: Option<Box<dyn StorageTier>>) -> Self {
        Self {
            tiers: primary.into_iter().chain(fallback).collect(),
            memory: MemoryStore::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(None, None)
    }

    /// A value written this session wins. Otherwise tiers are searched in
    /// write order and the first one holding the key decides, so a value
    /// that `set` could only place in a later tier is still found.
    pub fn get(&self, key: &str, fallback: &str) -> String {
        if let Ok(Some(value)) = self.memory.read(key) {
            return value;
        }
        for tier in &self.tiers {
            match tier.read(key) {
                Ok(Some(value)) => return value,
                Ok(None) => {}
                Err(err) => {
                    seek_warn!("Preference tier '{}' unreadable: {}", tier.name(), err);
                }
            }
        }
        fallback.to_string()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let _ = self.memory.write(key, value);
        for tier in &mut self.tiers {
            match tier.write(key, value) {
                Ok(()) => {
                    seek_debug!("Stored '{}' in {} tier", key, tier.name());
                    return;
                }
                Err(err) => {
                    seek_warn!("Preference tier '{}' rejected write: {}", tier.name(), err);
                }
            }
        }
        seek_warn!("No persistent storage available; '{}' kept for this session only", key);
    }
}

/// Reads the persisted wiki choice; anything outside the allowed set yields
/// the default endpoint.
pub fn load_endpoint(store: &PreferenceStore) -> WikiEndpoint {
    let default = WikiEndpoint::default();
    let stored = store.get(PREFERENCE_KEY, default.canonical_base());
    WikiEndpoint::from_base_url(&stored).unwrap_or_else(|| {
        seek_warn!("Ignoring stored wiki base {:?}; using {}", stored, default.label());
        default
    })
}

pub fn save_endpoint(store: &mut PreferenceStore, endpoint: WikiEndpoint) {
    store.set(PREFERENCE_KEY, endpoint.canonical_base());
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::Io(err)),
    }
}

/// Replaces `path` through a sibling temp file and a rename, so a reader
/// never sees a half-written preference file.
fn write_atomically(path: &Path, content: &str) -> Result<(), StorageError> {
    if path.file_name().is_none() {
        return Err(StorageError::Unavailable(format!("no file name in {path:?}")));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|err| StorageError::Io(err.error))?;
    Ok(())
}
