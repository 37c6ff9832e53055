//! Persistent key-value storage for dependency signatures
//!
//! The signature logic in [`crate::dependency`] only needs a string-keyed map
//! of `(path, signature)` lists. [`KvStore`] is that seam: [`JsonFileStore`]
//! keeps the map in a JSON document on disk, [`MemoryStore`] keeps it in
//! memory for tests.

use crate::error::{DependencyError, DependencyResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One recorded dependency: the path as declared and its signature
pub type SignatureRecord = (String, String);

/// String-keyed store of signature records
pub trait KvStore {
    /// Get the records stored under `key`
    fn get(&self, key: &str) -> Option<Vec<SignatureRecord>>;

    /// Replace the records stored under `key`
    fn set(&mut self, key: &str, records: Vec<SignatureRecord>) -> DependencyResult<()>;

    /// Remove `key`, returning whether it was present
    fn remove(&mut self, key: &str) -> DependencyResult<bool>;

    /// Number of keys in the store
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store, nothing survives the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<SignatureRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<SignatureRecord>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, records: Vec<SignatureRecord>) -> DependencyResult<()> {
        self.entries.insert(key.to_string(), records);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DependencyResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Store backed by a JSON file
///
/// Every write rewrites the whole document through a temporary file and a
/// rename, so the file on disk is always a complete snapshot.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Vec<SignatureRecord>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty document if it is absent
    pub fn open(path: impl AsRef<Path>) -> DependencyResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            let store = JsonFileStore {
                path,
                entries: BTreeMap::new(),
            };
            store.write()?;
            return Ok(store);
        }

        let contents = fs::read_to_string(&path).map_err(|e| DependencyError::io(&path, e))?;
        let entries = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents).map_err(|e| DependencyError::Corrupt {
                path: path.clone(),
                error: e.to_string(),
            })?
        };

        Ok(JsonFileStore { path, entries })
    }

    fn write(&self) -> DependencyResult<()> {
        let contents =
            serde_json::to_string_pretty(&self.entries).map_err(|e| DependencyError::Corrupt {
                path: self.path.clone(),
                error: e.to_string(),
            })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| DependencyError::io(parent, e))?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents).map_err(|e| DependencyError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| DependencyError::io(&self.path, e))?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Vec<SignatureRecord>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, records: Vec<SignatureRecord>) -> DependencyResult<()> {
        self.entries.insert(key.to_string(), records);
        self.write()
    }

    fn remove(&mut self, key: &str) -> DependencyResult<bool> {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.write()?;
        }
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
