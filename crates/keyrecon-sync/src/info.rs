//! Key-info extractors.
//!
//! A policy never sees stored values directly. It sees an *info* derived from
//! the entry by a [`KeyInfo`] extractor: the value itself ([`Identity`]), a
//! projection of it ([`ValueInfo`]), a content hash ([`HashInfo`]), or a
//! timestamp ([`FileTimestamp`], [`ModifiedTime`]).
//!
//! Extractors are only called for keys present in the store they are given.

use std::time::SystemTime;

use keyrecon_core::{ContentHash, CoreError};
use keyrecon_store::{FsBacked, ReadStore, Timestamped};

use crate::error::Result;
use crate::timestamp::local_file_timestamp;

/// Derives the comparable summary of an entry.
pub trait KeyInfo<S: ReadStore + ?Sized> {
    /// The summary type handed to the policy.
    type Info;

    /// Compute the info for `key`, which is present in `store`.
    fn info(&self, store: &S, key: &S::Key) -> Result<Self::Info>;
}

impl<S: ReadStore + ?Sized, X: KeyInfo<S> + ?Sized> KeyInfo<S> for &X {
    type Info = X::Info;

    fn info(&self, store: &S, key: &S::Key) -> Result<Self::Info> {
        (**self).info(store, key)
    }
}

/// The stored value itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<S: ReadStore + ?Sized> KeyInfo<S> for Identity {
    type Info = S::Value;

    fn info(&self, store: &S, key: &S::Key) -> Result<S::Value> {
        Ok(store.read(key)?)
    }
}

/// A function of the key and the stored value.
///
/// ```rust
/// use keyrecon_sync::{KeyInfo, ValueInfo};
/// use std::collections::HashMap;
///
/// let store: HashMap<&str, String> = [("a", "Hello".to_string())].into_iter().collect();
/// let lower = ValueInfo(|_: &&str, v: &String| v.to_lowercase());
/// assert_eq!(lower.info(&store, &"a").unwrap(), "hello");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValueInfo<F>(pub F);

impl<S, F, I> KeyInfo<S> for ValueInfo<F>
where
    S: ReadStore + ?Sized,
    F: Fn(&S::Key, &S::Value) -> I,
{
    type Info = I;

    fn info(&self, store: &S, key: &S::Key) -> Result<I> {
        let value = store.read(key)?;
        Ok((self.0)(key, &value))
    }
}

/// A fallible function of the key and the stored value.
///
/// Failures surface as [`CoreError`], usually
/// [`CoreError::ExtractorFailure`].
#[derive(Debug, Clone, Copy)]
pub struct TryValueInfo<F>(pub F);

impl<S, F, I> KeyInfo<S> for TryValueInfo<F>
where
    S: ReadStore + ?Sized,
    F: Fn(&S::Key, &S::Value) -> std::result::Result<I, CoreError>,
{
    type Info = I;

    fn info(&self, store: &S, key: &S::Key) -> Result<I> {
        let value = store.read(key)?;
        Ok((self.0)(key, &value)?)
    }
}

/// A function with direct access to the store, e.g. for metadata lookups.
#[derive(Debug, Clone, Copy)]
pub struct StoreInfo<F>(pub F);

impl<S, F, I> KeyInfo<S> for StoreInfo<F>
where
    S: ReadStore + ?Sized,
    F: Fn(&S, &S::Key) -> Result<I>,
{
    type Info = I;

    fn info(&self, store: &S, key: &S::Key) -> Result<I> {
        (self.0)(store, key)
    }
}

/// A function of the key alone. The store is not consulted.
#[derive(Debug, Clone, Copy)]
pub struct KeyFn<F>(pub F);

impl<S, F, I> KeyInfo<S> for KeyFn<F>
where
    S: ReadStore + ?Sized,
    F: Fn(&S::Key) -> I,
{
    type Info = I;

    fn info(&self, _store: &S, key: &S::Key) -> Result<I> {
        Ok((self.0)(key))
    }
}

/// Blake3 hash of the stored bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashInfo;

impl<S> KeyInfo<S> for HashInfo
where
    S: ReadStore + ?Sized,
    S::Value: AsRef<[u8]>,
{
    type Info = ContentHash;

    fn info(&self, store: &S, key: &S::Key) -> Result<ContentHash> {
        let value = store.read(key)?;
        Ok(ContentHash::of(value.as_ref()))
    }
}

/// Last-modified time of the local file behind the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTimestamp;

impl<S: FsBacked + ?Sized> KeyInfo<S> for FileTimestamp {
    type Info = SystemTime;

    fn info(&self, store: &S, key: &S::Key) -> Result<SystemTime> {
        local_file_timestamp(store, key)
    }
}

/// Last-modified time as tracked by the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedTime;

impl<S: Timestamped + ?Sized> KeyInfo<S> for ModifiedTime {
    type Info = SystemTime;

    fn info(&self, store: &S, key: &S::Key) -> Result<SystemTime> {
        Ok(store.modified(key)?)
    }
}
