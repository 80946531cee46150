//! Store traits: the capability interface consumed by the reconciliation driver.
//!
//! These traits let the driver be storage-agnostic. Implementations include
//! in-memory maps, directories on disk, and SQLite tables.

use std::fmt::Debug;
use std::hash::Hash;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::error::Result;

/// Read access to a key-value space.
///
/// # Design Notes
///
/// - `keys` returns each key once, in no particular order.
/// - `read` on an absent key fails with [`StoreError::NotFound`](crate::StoreError::NotFound).
pub trait ReadStore {
    /// Key type. Only equality and hashing are required.
    type Key: Clone + Eq + Hash + Debug;
    /// Value type. Opaque to the store traits.
    type Value;

    /// Enumerate all keys.
    fn keys(&self) -> Result<Vec<Self::Key>>;

    /// Check if a key exists.
    fn contains(&self, key: &Self::Key) -> Result<bool>;

    /// Read the value stored at `key`.
    fn read(&self, key: &Self::Key) -> Result<Self::Value>;

    /// Read the value at `key`, or `None` if absent.
    fn get(&self, key: &Self::Key) -> Result<Option<Self::Value>> {
        if self.contains(key)? {
            self.read(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Number of keys.
    fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    /// Whether the store has no keys.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Read-write access to a key-value space.
pub trait Store: ReadStore {
    /// Create or overwrite the entry at `key`.
    fn write(&mut self, key: &Self::Key, value: Self::Value) -> Result<()>;

    /// Remove the entry at `key`.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if absent.
    fn delete(&mut self, key: &Self::Key) -> Result<()>;
}

/// A store whose entries are local files.
pub trait FsBacked: ReadStore {
    /// The filesystem path underlying `key`.
    ///
    /// The path is returned whether or not the file currently exists.
    fn local_path(&self, key: &Self::Key) -> Result<PathBuf>;
}

/// A store that tracks when each entry was last modified.
pub trait Timestamped: ReadStore {
    /// Last-modified time of the entry at `key`.
    fn modified(&self, key: &Self::Key) -> Result<SystemTime>;
}

impl<S: ReadStore + ?Sized> ReadStore for &S {
    type Key = S::Key;
    type Value = S::Value;

    fn keys(&self) -> Result<Vec<Self::Key>> {
        (**self).keys()
    }

    fn contains(&self, key: &Self::Key) -> Result<bool> {
        (**self).contains(key)
    }

    fn read(&self, key: &Self::Key) -> Result<Self::Value> {
        (**self).read(key)
    }
}

impl<S: FsBacked + ?Sized> FsBacked for &S {
    fn local_path(&self, key: &Self::Key) -> Result<PathBuf> {
        (**self).local_path(key)
    }
}

impl<S: Timestamped + ?Sized> Timestamped for &S {
    fn modified(&self, key: &Self::Key) -> Result<SystemTime> {
        (**self).modified(key)
    }
}
