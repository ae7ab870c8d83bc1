use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::io;

pub const STAFF_AVAILABILITY_KEY: &str = "staff_availability.json";
pub const RESTRICTED_SLOTS_KEY: &str = "restricted_slots.json";
pub const SCHEDULE_WORKBOOK_KEY: &str = "schedule.xlsx";

/// Staff name -> availability record. Records are client-owned JSON objects;
/// the store only ever touches the `max_shifts` field.
pub type StaffAvailabilityDoc = Map<String, Value>;

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Conflict(String),
    CorruptData(String),
    Unavailable(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(msg) => write!(f, "not found: {msg}"),
            StoreError::Conflict(msg) => write!(f, "conflict: {msg}"),
            StoreError::CorruptData(msg) => write!(f, "corrupt document: {msg}"),
            StoreError::Unavailable(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::CorruptData(value.to_string())
    }
}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        Self::Unavailable(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage capability the document store is built on. Implementations hold
/// whole documents under string keys; `write` is a single full-body replace,
/// so either the whole document is swapped or the previous version remains.
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> StoreResult<Vec<u8>>;
    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;
    fn open_reader(&self, key: &str) -> StoreResult<Box<dyn io::Read + Send>>;
}

/// Named JSON documents over a pluggable [`StorageBackend`].
///
/// Merge operations are read-then-write: one logical transaction from the
/// caller's view, but not atomic across the read and the write. Concurrent
/// writers to the same document race and the last completed write wins.
pub struct DocumentStore {
    backend: Box<dyn StorageBackend>,
}

impl DocumentStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn get_document(&self, key: &str) -> StoreResult<Value> {
        let bytes = self.backend.read(key)?;
        let document = serde_json::from_slice(&bytes)?;
        Ok(document)
    }

    pub fn put_document(&self, key: &str, document: &Value) -> StoreResult<()> {
        self.put_json(key, document)
    }

    fn put_json<T: Serialize>(&self, key: &str, document: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        tracing::debug!(key, bytes = bytes.len(), "writing document");
        self.backend.write(key, &bytes)
    }

    pub fn staff_availability(&self) -> StoreResult<StaffAvailabilityDoc> {
        match self.get_document(STAFF_AVAILABILITY_KEY)? {
            Value::Object(doc) => Ok(doc),
            other => Err(StoreError::CorruptData(format!(
                "{STAFF_AVAILABILITY_KEY} holds {other} instead of an object"
            ))),
        }
    }

    /// Insert a new staff member. Rejects names that already exist; use
    /// [`DocumentStore::update_staff_availability`] to overwrite.
    pub fn add_staff_member(&self, name: &str, record: Value) -> StoreResult<()> {
        let mut doc = self.staff_availability()?;
        if doc.contains_key(name) {
            return Err(StoreError::Conflict(format!(
                "staff member {name} already exists"
            )));
        }
        doc.insert(name.to_string(), record);
        self.put_json(STAFF_AVAILABILITY_KEY, &doc)
    }

    pub fn remove_staff_member(&self, name: &str) -> StoreResult<()> {
        let mut doc = self.staff_availability()?;
        if doc.shift_remove(name).is_none() {
            return Err(StoreError::NotFound(format!(
                "staff member {name} not found"
            )));
        }
        self.put_json(STAFF_AVAILABILITY_KEY, &doc)
    }

    /// Set the `max_shifts` field on one staff record, leaving every other
    /// field and record untouched.
    pub fn set_max_shifts(&self, name: &str, max_shifts: Number) -> StoreResult<()> {
        let mut doc = self.staff_availability()?;
        match doc.get_mut(name) {
            Some(Value::Object(record)) => {
                record.insert("max_shifts".to_string(), Value::Number(max_shifts));
            }
            Some(_) => {
                return Err(StoreError::CorruptData(format!(
                    "staff record for {name} is not an object"
                )));
            }
            None => {
                return Err(StoreError::NotFound(format!(
                    "staff member {name} not found"
                )));
            }
        }
        self.put_json(STAFF_AVAILABILITY_KEY, &doc)
    }

    /// Unconditional upsert of one staff record.
    pub fn update_staff_availability(&self, name: &str, record: Value) -> StoreResult<()> {
        let mut doc = self.staff_availability()?;
        doc.insert(name.to_string(), record);
        self.put_json(STAFF_AVAILABILITY_KEY, &doc)
    }

    /// Replace the whole staff-availability document with caller-supplied
    /// content. No merge.
    pub fn replace_booked_dates(&self, doc: &StaffAvailabilityDoc) -> StoreResult<()> {
        self.put_json(STAFF_AVAILABILITY_KEY, doc)
    }

    pub fn restricted_slots(&self) -> StoreResult<Value> {
        self.get_document(RESTRICTED_SLOTS_KEY)
    }

    pub fn put_restricted_slots(&self, doc: &Value) -> StoreResult<()> {
        self.put_json(RESTRICTED_SLOTS_KEY, doc)
    }

    pub fn store_schedule_workbook(&self, bytes: &[u8]) -> StoreResult<()> {
        tracing::debug!(bytes = bytes.len(), "writing schedule workbook");
        self.backend.write(SCHEDULE_WORKBOOK_KEY, bytes)
    }

    pub fn open_schedule_workbook(&self) -> StoreResult<Box<dyn io::Read + Send>> {
        self.backend.open_reader(SCHEDULE_WORKBOOK_KEY)
    }
}

pub mod file;
pub mod memory;
