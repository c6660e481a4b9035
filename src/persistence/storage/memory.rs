use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::anyhow;

use super::{ReadBlobState, Storage, StorageError, StorageResult};

/// In-process storage. Clones share the same blobs, which lets a test keep a
/// handle on what the store has written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, anyhow::Error> {
        self.blobs
            .lock()
            .map_err(|_| anyhow!("memory storage lock was poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    fn write_blob(&self, path: String, bytes: Vec<u8>) -> StorageResult<()> {
        self.blobs()
            .map_err(StorageError::UnableToWriteBlob)?
            .insert(path, bytes);

        Ok(())
    }

    fn read_blob(&self, path: String) -> StorageResult<ReadBlobState> {
        let blobs = self.blobs().map_err(StorageError::UnableToReadBlob)?;

        Ok(match blobs.get(&path) {
            Some(bytes) => ReadBlobState::Found(bytes.clone()),
            None => ReadBlobState::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_blobs() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage
            .write_blob("state".to_string(), b"[]".to_vec())
            .unwrap();

        assert_eq!(
            handle.read_blob("state".to_string()).unwrap(),
            ReadBlobState::Found(b"[]".to_vec())
        );
        assert_eq!(
            handle.read_blob("other".to_string()).unwrap(),
            ReadBlobState::NotFound
        );
    }
}
