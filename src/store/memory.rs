use super::{StorageBackend, StoreError, StoreResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Cursor, Read};

/// In-memory backend, used by tests in place of real storage and usable for
/// ephemeral deployments. The lock guards the map itself only;
/// read-modify-write sequences across calls still race like on any other
/// backend.
#[derive(Default)]
pub struct MemoryBackend {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, builder-style.
    pub fn with_document(self, key: &str, bytes: &[u8]) -> Self {
        self.objects.write().insert(key.to_string(), bytes.to_vec());
        self
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("document {key} does not exist")))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.objects.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn open_reader(&self, key: &str) -> StoreResult<Box<dyn Read + Send>> {
        let bytes = self.read(key)?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}
