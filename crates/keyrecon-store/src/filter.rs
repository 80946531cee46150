//! Key-filtered view of a store.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::error::{Result, StoreError};
use crate::traits::{FsBacked, ReadStore, Store, Timestamped};

/// A store restricted to the keys accepted by a predicate.
///
/// Excluded keys are invisible: they are not enumerated, `contains` reports
/// them absent, reads fail with [`StoreError::NotFound`], and writes or
/// deletes fail with [`StoreError::InvalidKey`].
///
/// ```rust
/// use std::collections::HashMap;
/// use keyrecon_store::{FilteredStore, ReadStore};
///
/// let files: HashMap<String, &str> = [
///     ("mod.py".to_string(), "x = 1"),
///     ("__pycache__/mod.pyc".to_string(), ""),
/// ]
/// .into_iter()
/// .collect();
///
/// let py = FilteredStore::new(files, |k: &String| k.ends_with(".py") && !k.contains("__pycache__"));
/// assert_eq!(py.keys().unwrap(), vec!["mod.py".to_string()]);
/// ```
pub struct FilteredStore<S, F> {
    inner: S,
    accept: F,
}

impl<S, F> FilteredStore<S, F>
where
    S: ReadStore,
    F: Fn(&S::Key) -> bool,
{
    /// Wrap `inner`, keeping only keys for which `accept` returns true.
    pub fn new(inner: S, accept: F) -> Self {
        Self { inner, accept }
    }

    /// Borrow the unfiltered store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap into the unfiltered store.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn accepts(&self, key: &S::Key) -> bool {
        (self.accept)(key)
    }
}

impl<S, F> ReadStore for FilteredStore<S, F>
where
    S: ReadStore,
    F: Fn(&S::Key) -> bool,
{
    type Key = S::Key;
    type Value = S::Value;

    fn keys(&self) -> Result<Vec<S::Key>> {
        let mut keys = self.inner.keys()?;
        keys.retain(|k| self.accepts(k));
        Ok(keys)
    }

    fn contains(&self, key: &S::Key) -> Result<bool> {
        if !self.accepts(key) {
            return Ok(false);
        }
        self.inner.contains(key)
    }

    fn read(&self, key: &S::Key) -> Result<S::Value> {
        if !self.accepts(key) {
            return Err(StoreError::not_found(key));
        }
        self.inner.read(key)
    }
}

impl<S, F> Store for FilteredStore<S, F>
where
    S: Store,
    F: Fn(&S::Key) -> bool,
{
    fn write(&mut self, key: &S::Key, value: S::Value) -> Result<()> {
        if !self.accepts(key) {
            return Err(StoreError::invalid_key(key));
        }
        self.inner.write(key, value)
    }

    fn delete(&mut self, key: &S::Key) -> Result<()> {
        if !self.accepts(key) {
            return Err(StoreError::invalid_key(key));
        }
        self.inner.delete(key)
    }
}

impl<S, F> FsBacked for FilteredStore<S, F>
where
    S: FsBacked,
    F: Fn(&S::Key) -> bool,
{
    fn local_path(&self, key: &S::Key) -> Result<PathBuf> {
        if !self.accepts(key) {
            return Err(StoreError::not_found(key));
        }
        self.inner.local_path(key)
    }
}

impl<S, F> Timestamped for FilteredStore<S, F>
where
    S: Timestamped,
    F: Fn(&S::Key) -> bool,
{
    fn modified(&self, key: &S::Key) -> Result<SystemTime> {
        if !self.accepts(key) {
            return Err(StoreError::not_found(key));
        }
        self.inner.modified(key)
    }
}
