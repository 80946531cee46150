//! Filesystem timestamps.

use std::fs;
use std::io;
use std::time::SystemTime;

use keyrecon_store::{FsBacked, StoreError};

use crate::error::Result;

/// Last-modified time of the local file underlying `key`.
///
/// # Errors
///
/// [`StoreError::NotFound`] if the file does not exist, [`StoreError::Io`]
/// for any other filesystem failure.
pub fn local_file_timestamp<S: FsBacked + ?Sized>(store: &S, key: &S::Key) -> Result<SystemTime> {
    let path = store.local_path(key)?;
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StoreError::not_found(key),
        _ => StoreError::Io(e),
    })?;
    Ok(metadata.modified().map_err(StoreError::Io)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use keyrecon_store::{FileStore, Store};
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn test_local_file_timestamp() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let key = "f.txt".to_string();
        store.write(&key, Bytes::from_static(b"x")).unwrap();

        let when = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        File::options()
            .write(true)
            .open(dir.path().join("f.txt"))
            .unwrap()
            .set_modified(when)
            .unwrap();

        assert_eq!(local_file_timestamp(&store, &key).unwrap(), when);
    }

    #[test]
    fn test_local_file_timestamp_missing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let err = local_file_timestamp(&store, &"missing.txt".to_string()).unwrap_err();
        assert!(err.is_not_found());
    }
}
