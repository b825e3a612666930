// src/infrastructure/storage.rs
use crate::application::TokenStore;
use crate::constants::TOKEN_STORAGE_KEY;
use crate::domain::DomainError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

/// String key/value storage persisted as one JSON object.
///
/// Every read goes to disk, so writes by other processes are seen by the
/// next `load`. Writes replace the file atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.read_all()?.remove(key))
    }

    #[instrument(level = "debug", skip(self, value))]
    pub fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&entries)
    }

    /// Replaces the file with an empty object, dropping every key.
    pub fn reset(&self) -> Result<(), DomainError> {
        self.write_all(&BTreeMap::new())
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, DomainError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DomainError::StorageError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            DomainError::StorageError(format!("Corrupt storage file {}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), DomainError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| {
            DomainError::StorageError(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::StorageError(e.to_string()))?;
        let mut file = NamedTempFile::new_in(&dir)
            .map_err(|e| DomainError::StorageError(format!("Failed to create temp file: {}", e)))?;
        file.write_all(json.as_bytes())
            .map_err(|e| DomainError::StorageError(format!("Failed to write storage: {}", e)))?;
        file.persist(&self.path).map_err(|e| {
            DomainError::StorageError(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        debug!(path = ?self.path, keys = entries.len(), "Storage written");
        Ok(())
    }
}

/// Session token kept under [`TOKEN_STORAGE_KEY`] in a [`FileStorage`].
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    storage: FileStorage,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: FileStorage::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

/// An unreadable storage file means "no session"; writes replace it.
impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, DomainError> {
        match self.storage.get(TOKEN_STORAGE_KEY) {
            Ok(token) => Ok(token),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable storage file");
                Ok(None)
            }
        }
    }

    fn save(&mut self, token: &str) -> Result<(), DomainError> {
        match self.storage.set(TOKEN_STORAGE_KEY, token) {
            Err(DomainError::StorageError(e)) => {
                warn!(error = %e, "Replacing unreadable storage file");
                self.storage.reset()?;
                self.storage.set(TOKEN_STORAGE_KEY, token)
            }
            other => other,
        }
    }

    fn clear(&mut self) -> Result<(), DomainError> {
        match self.storage.remove(TOKEN_STORAGE_KEY) {
            Err(DomainError::StorageError(e)) => {
                warn!(error = %e, "Replacing unreadable storage file");
                self.storage.reset()
            }
            other => other,
        }
    }
}
