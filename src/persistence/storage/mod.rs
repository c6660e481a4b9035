use std::path::PathBuf;

use thiserror::Error;

use self::{file::FileStorage, memory::MemoryStorage};

pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod memory;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unable to initialize persistence: {0}")]
    UnableToInitializePersistence(anyhow::Error),
    #[error("Unable to write blob: {0}")]
    UnableToWriteBlob(anyhow::Error),
    #[error("Unable to read blob: {0}")]
    UnableToReadBlob(anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

pub fn io_to_generic_error(error: std::io::Error) -> anyhow::Error {
    anyhow::Error::new(error)
}

#[derive(Debug, PartialEq)]
pub enum ReadBlobState {
    Found(Vec<u8>),
    NotFound,
}

/// A flat key to bytes store. The employee store only ever uses one key.
pub trait Storage {
    // Called on start-up, should be idempotent
    fn init(&self) -> StorageResult<()>;
    fn write_blob(&self, path: String, bytes: Vec<u8>) -> StorageResult<()>;
    fn read_blob(&self, path: String) -> StorageResult<ReadBlobState>;
}

#[derive(Debug, Clone)]
pub enum StorageEngine {
    /// One file per key under the given directory
    File(PathBuf),
    /// Process memory, cloning the handle shares the same blobs
    Memory(MemoryStorage),
    /// The browser's `window.localStorage`
    #[cfg(target_arch = "wasm32")]
    LocalStorage,
}

impl StorageEngine {
    pub fn get_engine(&self) -> Box<dyn Storage + Send> {
        match self {
            StorageEngine::File(path) => Box::new(FileStorage::new(path.clone())),
            StorageEngine::Memory(memory) => Box::new(memory.clone()),
            #[cfg(target_arch = "wasm32")]
            StorageEngine::LocalStorage => Box::new(local_storage::LocalStorage),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StorageEngine::File(path) => format!("File [{}]", path.display()),
            StorageEngine::Memory(_) => "Memory".to_string(),
            #[cfg(target_arch = "wasm32")]
            StorageEngine::LocalStorage => "LocalStorage".to_string(),
        }
    }
}
