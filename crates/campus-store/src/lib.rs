//! # campus-store
//!
//! Key-value session storage for completed quiz results.
//!
//! A flow never touches a storage medium directly. It is handed a
//! [`SessionStore`] (in-memory for tests and throwaway runs, one file per key
//! for the CLI) and reads and writes its snapshot through
//! [`ResultPersistence`] under the key names of its domain descriptor.

mod error;
mod file;
mod memory;
mod persistence;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::ResultPersistence;

/// String key-value storage scoped to one user.
pub trait SessionStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing medium cannot be written.
    fn clear(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).clear(key)
    }
}
