//! Filesystem-backed store.
//!
//! Entries are the regular files under a root directory. Keys are paths
//! relative to the root, always `/`-separated regardless of platform, and
//! values are the raw file bytes.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use walkdir::WalkDir;

use crate::error::{Result, StoreError};
use crate::traits::{FsBacked, ReadStore, Store, Timestamped};

/// A store over the files of a directory tree.
///
/// # Keys
///
/// `"file1.txt"`, `"pkg/mod.py"`. Keys that are empty, absolute, or contain
/// `.`/`..` components are rejected with [`StoreError::InvalidKey`].
///
/// # Depth
///
/// With [`FileStore::with_max_levels`] enumeration stops descending below the
/// given depth: `0` lists only files directly under the root.
///
/// # Example
///
/// ```no_run
/// use bytes::Bytes;
/// use keyrecon_store::{FileStore, ReadStore, Store};
///
/// let mut store = FileStore::create("/tmp/keyrecon-demo").unwrap();
/// store.write(&"notes/today.txt".to_string(), Bytes::from_static(b"hello")).unwrap();
/// assert!(store.contains(&"notes/today.txt".to_string()).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_levels: Option<usize>,
}

impl FileStore {
    /// Open a store over an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if `root` is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
            max_levels: None,
        })
    }

    /// Open a store, creating the root directory if needed.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Self::open(root)
    }

    /// Limit how deep key enumeration descends.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = Some(max_levels);
        self
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its path under the root.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        // Empty segments would silently collapse ("a//b", "a/")
        if key.contains('\\')
            || key
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StoreError::invalid_key(key));
        }

        let mut path = self.root.clone();
        for component in Path::new(key).components() {
            match component {
                Component::Normal(part) => path.push(part),
                _ => return Err(StoreError::invalid_key(key)),
            }
        }
        Ok(path)
    }

    /// The relative `/`-joined key for a path under the root.
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }
}

/// Map an I/O error on `key`, turning a missing file into [`StoreError::NotFound`].
fn io_error(key: &str, err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::not_found(key)
    } else {
        StoreError::Io(err)
    }
}

impl ReadStore for FileStore {
    type Key = String;
    type Value = Bytes;

    fn keys(&self) -> Result<Vec<String>> {
        // Files directly under the root sit at walk depth 1
        let mut walker = WalkDir::new(&self.root).min_depth(1);
        if let Some(max) = self.max_levels {
            walker = walker.max_depth(max + 1);
        }

        let mut keys = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        "skipping unreadable entry under {}: {}",
                        self.root.display(),
                        err
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match self.key_for(entry.path()) {
                Some(key) => keys.push(key),
                None => tracing::warn!("skipping non-UTF-8 entry {:?}", entry.path()),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn contains(&self, key: &String) -> Result<bool> {
        // A key that cannot name a file under the root is simply absent
        Ok(self.path_for(key).map_or(false, |path| path.is_file()))
    }

    fn read(&self, key: &String) -> Result<Bytes> {
        let path = self.path_for(key)?;
        fs::read(&path)
            .map(Bytes::from)
            .map_err(|e| io_error(key, e))
    }
}

impl Store for FileStore {
    fn write(&mut self, key: &String, value: Bytes) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &value)?;
        Ok(())
    }

    fn delete(&mut self, key: &String) -> Result<()> {
        let path = self.path_for(key)?;
        fs::remove_file(&path).map_err(|e| io_error(key, e))
    }
}

impl FsBacked for FileStore {
    fn local_path(&self, key: &String) -> Result<PathBuf> {
        self.path_for(key)
    }
}

impl Timestamped for FileStore {
    fn modified(&self, key: &String) -> Result<SystemTime> {
        let path = self.path_for(key)?;
        let metadata = fs::metadata(&path).map_err(|e| io_error(key, e))?;
        Ok(metadata.modified()?)
    }
}
