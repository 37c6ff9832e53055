//! Dependency tracking
//!
//! Decides whether a task is up to date by comparing the signatures of its
//! declared dependencies with the ones recorded after its last successful run.

pub mod signature;
pub mod store;

pub use signature::file_signature;
pub use store::{JsonFileStore, KvStore, MemoryStore, SignatureRecord};

use crate::error::DependencyResult;
use crate::runner::Task;
use std::path::Path;

/// Signature store for registered tasks
pub struct Dependency {
    store: Box<dyn KvStore>,
}

impl Dependency {
    /// Open the JSON signature file at `path`, creating it if absent
    pub fn open(path: impl AsRef<Path>) -> DependencyResult<Self> {
        Ok(Self::with_store(Box::new(JsonFileStore::open(path)?)))
    }

    /// Use an already opened store
    pub fn with_store(store: Box<dyn KvStore>) -> Self {
        Dependency { store }
    }

    /// Check whether every declared dependency still has its recorded signature
    ///
    /// A task that never ran successfully is not up to date. A task without
    /// dependencies is up to date once it has been recorded.
    pub fn is_up_to_date(&self, task: &Task) -> bool {
        let Some(records) = self.store.get(task.name()) else {
            return false;
        };

        task.dependencies().iter().all(|dep| {
            let key = dependency_key(dep);
            let Some((_, recorded)) = records.iter().find(|(path, _)| *path == key) else {
                return false;
            };
            match file_signature(dep) {
                Ok(current) => current == *recorded,
                Err(_) => false,
            }
        })
    }

    /// Store fresh signatures for every dependency of `task`
    ///
    /// Nothing is written if any dependency cannot be read.
    pub fn record(&mut self, task: &Task) -> DependencyResult<()> {
        let records = task
            .dependencies()
            .iter()
            .map(|dep| Ok((dependency_key(dep), file_signature(dep)?)))
            .collect::<DependencyResult<Vec<SignatureRecord>>>()?;

        self.store.set(task.name(), records)
    }

    /// Drop the recorded signatures of a task
    pub fn forget(&mut self, name: &str) -> DependencyResult<bool> {
        self.store.remove(name)
    }

    /// Recorded signatures for a task name
    pub fn records(&self, name: &str) -> Option<Vec<SignatureRecord>> {
        self.store.get(name)
    }

    /// Number of tasks with recorded signatures
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

fn dependency_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
