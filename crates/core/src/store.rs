//! Key-value store for client state.
//!
//! Values are strings under named slots, the same shape as browser local
//! storage. Structured values go through [`KeyValueStore::load_json`] and
//! [`KeyValueStore::save_json`].

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Errors from a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode slot `{slot}`: {source}")]
    Encode {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A store shared between services.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// A string-keyed, string-valued persistent store.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a slot. Missing slots are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Delete every slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), StoreError>;

    /// Read a slot as JSON.
    ///
    /// A slot that does not parse as `T` is logged and reported as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
    {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(slot = key, error = %e, "Ignoring unreadable slot");
                Ok(None)
            }
        }
    }

    /// Write a slot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the storage cannot be written.
    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            slot: key.to_owned(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.slots().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slots().clear();
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Every read goes to disk and every write replaces the file through a
/// uniquely named temporary sibling and a rename, so the file is always the current state
/// and a crash mid-write leaves the previous version intact. Separate
/// processes sharing the file are last-writer-wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Use `path` as the state file. It is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&raw) {
            Ok(slots) => Ok(slots),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State file unreadable, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, slots: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
                parent
            }
            None => Path::new("."),
        };
        let body = serde_json::to_string_pretty(slots).map_err(|source| StoreError::Encode {
            slot: "*".to_owned(),
            source,
        })?;
        // Unique per write; concurrent writers never share a temp file.
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(body.as_bytes()).map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.read_all()?;
        f(&mut slots);
        self.write_all(&slots)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|slots| {
            slots.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|slots| {
            slots.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(BTreeMap::clear)
    }
}
