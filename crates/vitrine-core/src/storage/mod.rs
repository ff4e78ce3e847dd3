//! Session-scoped key/value storage
//!
//! Only the slider hint flags live here. Backends may be missing entirely
//! (private browsing, disabled storage); callers treat every error as "not set".

mod file;
mod memory;

use crate::error::StorageError;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;

/// String key/value store that lives for one browsing session
pub trait SessionStorage: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any existing one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage that is never available
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl SessionStorage for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
