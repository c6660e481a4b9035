use std::{path::PathBuf, time::Duration};

use crate::persistence::storage::{memory::MemoryStorage, StorageEngine};

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub storage_engine: StorageEngine,
    pub request_timeout: Duration,
    pub validate_writes: bool,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl StoreOptions {
    pub fn set_storage_engine(mut self, storage_engine: StorageEngine) -> Self {
        self.storage_engine = storage_engine;
        self
    }

    /// How long a request manager waits for the store worker before giving up
    pub fn set_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Defines whether a transformed collection is checked against the schema
    /// before it is persisted. When off, a bad collection is only caught by the
    /// next read.
    pub fn set_validate_writes(mut self, validate_writes: bool) -> Self {
        self.validate_writes = validate_writes;
        self
    }

    /// Fresh, isolated in-memory storage
    pub fn new_in_memory() -> Self {
        StoreOptions::default().set_storage_engine(StorageEngine::Memory(MemoryStorage::new()))
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_engine: StorageEngine::File(PathBuf::from("data")),
            request_timeout: Duration::from_secs(2),
            validate_writes: true,
        }
    }
}
