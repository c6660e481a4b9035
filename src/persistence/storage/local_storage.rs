use anyhow::anyhow;

use super::{ReadBlobState, Storage, StorageError, StorageResult};

/// Backed by `window.localStorage`, blobs are stored as UTF-8 strings
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, anyhow::Error> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| anyhow!("localStorage is not available"))
    }
}

impl Storage for LocalStorage {
    fn init(&self) -> StorageResult<()> {
        Self::storage()
            .map(|_| ())
            .map_err(StorageError::UnableToInitializePersistence)
    }

    fn write_blob(&self, path: String, bytes: Vec<u8>) -> StorageResult<()> {
        let storage = Self::storage().map_err(StorageError::UnableToWriteBlob)?;

        let value = String::from_utf8(bytes)
            .map_err(|e| StorageError::UnableToWriteBlob(anyhow::Error::new(e)))?;

        storage
            .set_item(&path, &value)
            .map_err(|e| StorageError::UnableToWriteBlob(anyhow!("{:?}", e)))
    }

    fn read_blob(&self, path: String) -> StorageResult<ReadBlobState> {
        let storage = Self::storage().map_err(StorageError::UnableToReadBlob)?;

        match storage.get_item(&path) {
            Ok(Some(value)) => Ok(ReadBlobState::Found(value.into_bytes())),
            Ok(None) => Ok(ReadBlobState::NotFound),
            Err(e) => Err(StorageError::UnableToReadBlob(anyhow!("{:?}", e))),
        }
    }
}
