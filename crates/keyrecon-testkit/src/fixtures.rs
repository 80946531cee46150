//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use bytes::Bytes;
use keyrecon_store::{FileStore, MemoryStore, ReadStore, Result, Store};
use tempfile::TempDir;

/// A pair of temporary directories holding a target and a source tree.
pub struct TempDirs {
    pub target: TempDir,
    pub source: TempDir,
}

impl TempDirs {
    /// Create two empty directories.
    pub fn new() -> Self {
        Self {
            target: TempDir::new().expect("create target dir"),
            source: TempDir::new().expect("create source dir"),
        }
    }

    /// Write a file in the target tree with the given mtime (Unix seconds).
    pub fn write_target(&self, name: &str, contents: &str, mtime_secs: u64) {
        write_file_at(self.target.path(), name, contents, mtime_secs);
    }

    /// Write a file in the source tree with the given mtime (Unix seconds).
    pub fn write_source(&self, name: &str, contents: &str, mtime_secs: u64) {
        write_file_at(self.source.path(), name, contents, mtime_secs);
    }

    /// Open both trees as file stores, target first.
    pub fn stores(&self) -> (FileStore, FileStore) {
        (
            FileStore::open(self.target.path()).expect("open target store"),
            FileStore::open(self.source.path()).expect("open source store"),
        )
    }

    /// Contents of a target file, if it exists.
    pub fn read_target(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.target.path().join(name)).ok()
    }
}

impl Default for TempDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `contents` to `dir/name`, creating parents, and pin its mtime.
pub fn write_file_at(dir: &Path, name: &str, contents: &str, mtime_secs: u64) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, contents).expect("write file");
    File::options()
        .write(true)
        .open(&path)
        .and_then(|f| f.set_modified(UNIX_EPOCH + Duration::from_secs(mtime_secs)))
        .expect("set mtime");
}

/// Build a memory store from literal pairs.
pub fn memory_store<V: Clone>(pairs: &[(&str, V)]) -> MemoryStore<String, V> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Build a byte-valued memory store from literal text pairs.
pub fn byte_store(pairs: &[(&str, &str)]) -> MemoryStore<String, Bytes> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Bytes::copy_from_slice(v.as_bytes())))
        .collect()
}

/// A per-key store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Contains,
    Read,
    Write,
    Delete,
}

/// Wraps a store and logs every per-key operation made through it.
pub struct RecordingStore<S: ReadStore> {
    inner: S,
    log: RefCell<Vec<(Access, S::Key)>>,
    listings: Cell<usize>,
}

impl<S: ReadStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            log: RefCell::new(Vec::new()),
            listings: Cell::new(0),
        }
    }

    /// Every recorded operation, in call order.
    pub fn accesses(&self) -> Vec<(Access, S::Key)> {
        self.log.borrow().clone()
    }

    /// The distinct keys any operation touched.
    pub fn touched_keys(&self) -> HashSet<S::Key> {
        self.log.borrow().iter().map(|(_, k)| k.clone()).collect()
    }

    /// Keys touched by a given kind of operation.
    pub fn keys_with(&self, access: Access) -> HashSet<S::Key> {
        self.log
            .borrow()
            .iter()
            .filter(|(a, _)| *a == access)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// How many times the key list was enumerated.
    pub fn listings(&self) -> usize {
        self.listings.get()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn record(&self, access: Access, key: &S::Key) {
        self.log.borrow_mut().push((access, key.clone()));
    }
}

impl<S: ReadStore> ReadStore for RecordingStore<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn keys(&self) -> Result<Vec<S::Key>> {
        self.listings.set(self.listings.get() + 1);
        self.inner.keys()
    }

    fn contains(&self, key: &S::Key) -> Result<bool> {
        self.record(Access::Contains, key);
        self.inner.contains(key)
    }

    fn read(&self, key: &S::Key) -> Result<S::Value> {
        self.record(Access::Read, key);
        self.inner.read(key)
    }
}

impl<S: Store> Store for RecordingStore<S> {
    fn write(&mut self, key: &S::Key, value: S::Value) -> Result<()> {
        self.record(Access::Write, key);
        self.inner.write(key, value)
    }

    fn delete(&mut self, key: &S::Key) -> Result<()> {
        self.record(Access::Delete, key);
        self.inner.delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dirs_mtime() {
        let dirs = TempDirs::new();
        dirs.write_target("a/b.txt", "x", 1_000);

        let (target, _source) = dirs.stores();
        let key = "a/b.txt".to_string();
        assert_eq!(
            keyrecon_store::Timestamped::modified(&target, &key).unwrap(),
            UNIX_EPOCH + Duration::from_secs(1_000)
        );
        assert_eq!(dirs.read_target("a/b.txt").as_deref(), Some("x"));
    }

    #[test]
    fn test_recording_store_logs_accesses() {
        let mut store = RecordingStore::new(memory_store(&[("a", 1)]));
        let a = "a".to_string();
        let b = "b".to_string();

        assert!(store.contains(&a).unwrap());
        store.read(&a).unwrap();
        store.write(&b, 2).unwrap();
        store.delete(&a).unwrap();
        store.keys().unwrap();

        assert_eq!(
            store.accesses(),
            vec![
                (Access::Contains, a.clone()),
                (Access::Read, a.clone()),
                (Access::Write, b.clone()),
                (Access::Delete, a.clone()),
            ]
        );
        assert_eq!(store.keys_with(Access::Write), [b].into_iter().collect());
        assert_eq!(store.listings(), 1);
    }
}
