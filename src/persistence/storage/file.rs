use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::PathBuf,
};

use super::{io_to_generic_error, ReadBlobState, Storage, StorageError, StorageResult};

pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn get_path(&self, path: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", path))
    }
}

impl Storage for FileStorage {
    fn init(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path)
            .map_err(|e| StorageError::UnableToInitializePersistence(io_to_generic_error(e)))
    }

    fn write_blob(&self, path: String, bytes: Vec<u8>) -> StorageResult<()> {
        // Whole collection is replaced on every write, never appended to
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.get_path(&path))
            .map_err(|e| StorageError::UnableToWriteBlob(io_to_generic_error(e)))?;

        file.write_all(&bytes)
            .map_err(|e| StorageError::UnableToWriteBlob(io_to_generic_error(e)))
    }

    fn read_blob(&self, path: String) -> StorageResult<ReadBlobState> {
        let mut file = match File::open(self.get_path(&path)) {
            Ok(file) => file,
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => return Ok(ReadBlobState::NotFound),
                _ => return Err(StorageError::UnableToReadBlob(io_to_generic_error(err))),
            },
        };

        let mut buf = Vec::new();

        file.read_to_end(&mut buf)
            .map_err(|e| StorageError::UnableToReadBlob(io_to_generic_error(e)))?;

        Ok(ReadBlobState::Found(buf))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn test_storage() -> FileStorage {
        let base_path: PathBuf = ["/", "tmp", "benefits", &Uuid::new_v4().to_string()]
            .iter()
            .collect();

        let storage = FileStorage::new(base_path);
        storage.init().expect("Should be able to create the test directory");
        storage
    }

    #[test]
    fn missing_blob_is_not_found() {
        let storage = test_storage();

        assert_eq!(
            storage.read_blob("state".to_string()).unwrap(),
            ReadBlobState::NotFound
        );
    }

    #[test]
    fn write_then_read() {
        let storage = test_storage();

        storage
            .write_blob("state".to_string(), b"[]".to_vec())
            .unwrap();

        assert_eq!(
            storage.read_blob("state".to_string()).unwrap(),
            ReadBlobState::Found(b"[]".to_vec())
        );
    }

    #[test]
    fn shorter_write_replaces_longer_blob() {
        let storage = test_storage();

        storage
            .write_blob("state".to_string(), b"[1, 2, 3, 4]".to_vec())
            .unwrap();
        storage
            .write_blob("state".to_string(), b"[]".to_vec())
            .unwrap();

        assert_eq!(
            storage.read_blob("state".to_string()).unwrap(),
            ReadBlobState::Found(b"[]".to_vec())
        );
    }

    #[test]
    fn init_is_idempotent() {
        let storage = test_storage();

        assert!(storage.init().is_ok());
        assert!(storage.init().is_ok());
    }
}
