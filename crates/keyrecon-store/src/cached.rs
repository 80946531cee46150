//! Key-list caching wrapper.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::error::Result;
use crate::traits::{FsBacked, ReadStore, Store, Timestamped};

/// Enumerates the wrapped store once and serves `keys` from memory.
///
/// Writes and deletes made through the wrapper keep the cached list in step.
/// Changes made to the inner store behind the wrapper's back are not seen
/// until [`CachedKeys::refresh`].
pub struct CachedKeys<S: ReadStore> {
    inner: S,
    keys: OnceCell<HashSet<S::Key>>,
}

impl<S: ReadStore> CachedKeys<S> {
    /// Wrap `inner`; the first `keys` call populates the cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            keys: OnceCell::new(),
        }
    }

    /// Drop the cached key list.
    pub fn refresh(&mut self) {
        self.keys = OnceCell::new();
    }

    /// Whether the key list has been loaded.
    pub fn is_cached(&self) -> bool {
        self.keys.get().is_some()
    }

    /// Borrow the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap into the wrapped store.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ReadStore> ReadStore for CachedKeys<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn keys(&self) -> Result<Vec<S::Key>> {
        if let Some(keys) = self.keys.get() {
            return Ok(keys.iter().cloned().collect());
        }
        let keys: HashSet<S::Key> = self.inner.keys()?.into_iter().collect();
        Ok(self.keys.get_or_init(|| keys).iter().cloned().collect())
    }

    fn contains(&self, key: &S::Key) -> Result<bool> {
        match self.keys.get() {
            Some(keys) => Ok(keys.contains(key)),
            None => self.inner.contains(key),
        }
    }

    fn read(&self, key: &S::Key) -> Result<S::Value> {
        self.inner.read(key)
    }
}

impl<S: Store> Store for CachedKeys<S> {
    fn write(&mut self, key: &S::Key, value: S::Value) -> Result<()> {
        self.inner.write(key, value)?;
        if let Some(keys) = self.keys.get_mut() {
            keys.insert(key.clone());
        }
        Ok(())
    }

    fn delete(&mut self, key: &S::Key) -> Result<()> {
        self.inner.delete(key)?;
        if let Some(keys) = self.keys.get_mut() {
            keys.remove(key);
        }
        Ok(())
    }
}

impl<S: FsBacked> FsBacked for CachedKeys<S> {
    fn local_path(&self, key: &S::Key) -> Result<PathBuf> {
        self.inner.local_path(key)
    }
}

impl<S: Timestamped> Timestamped for CachedKeys<S> {
    fn modified(&self, key: &S::Key) -> Result<SystemTime> {
        self.inner.modified(key)
    }
}
