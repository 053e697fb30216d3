use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{ConfigDirs, ConfigPathError};

const THEME_STORE_FILE: &str = "theme.json";

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read store: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write store: {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse store")]
    Parse(#[from] serde_json::Error),
    #[error("store is unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence used for preferences that must survive a restart.
pub trait PersistenceStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> StoreResult<()>;
}

impl<T: PersistenceStore + ?Sized> PersistenceStore for Rc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

impl<T: PersistenceStore + ?Sized> PersistenceStore for Box<T> {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores every key as a member of a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn with_default_path() -> StoreResult<Self> {
        Self::in_dirs(&ConfigDirs::from_env())
    }

    fn in_dirs(dirs: &ConfigDirs) -> StoreResult<Self> {
        let path = dirs
            .app_file(THEME_STORE_FILE)
            .map_err(|error| match error {
                ConfigPathError::MissingHomeDirectory => StoreError::MissingHomeDirectory,
            })?;
        Ok(Self::at(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StoreResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let serialized = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        match serde_json::from_str::<Value>(&serialized)? {
            Value::Object(entries) => Ok(entries),
            _ => Ok(Map::new()),
        }
    }
}

impl PersistenceStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        // Keep the other keys; a corrupt file is replaced rather than blocking the write.
        let mut entries = self.read_entries().unwrap_or_else(|err| {
            tracing::warn!(?err, path = %self.path.display(), "discarding unreadable store");
            Map::new()
        });
        entries.insert(key.to_string(), value);

        let serialized = serde_json::to_string_pretty(&Value::Object(entries))?;
        fs::write(&self.path, serialized).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
