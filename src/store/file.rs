use super::{StorageBackend, StoreError, StoreResult};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

/// Filesystem backend: one file per document key inside a data directory.
///
/// Writes land in a sibling temp file first and are renamed over the target,
/// so a reader never observes a half-written document.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(
                format!("document {key} does not exist"),
            )),
            Err(err) => Err(StoreError::Unavailable(err)),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn open_reader(&self, key: &str) -> StoreResult<Box<dyn Read + Send>> {
        match File::open(self.path_for(key)) {
            Ok(file) => Ok(Box::new(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(
                format!("document {key} does not exist"),
            )),
            Err(err) => Err(StoreError::Unavailable(err)),
        }
    }
}
