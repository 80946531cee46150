//! Value codecs and the decoding store wrapper.
//!
//! File and SQLite stores hold raw bytes. [`CodecStore`] presents such a
//! store with typed values: reads are decoded, writes are encoded.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::SystemTime;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::traits::{FsBacked, ReadStore, Store, Timestamped};

/// Converts between stored bytes and a typed value.
pub trait Codec {
    /// The decoded value type.
    type Value;

    /// Decode stored bytes.
    fn decode(&self, raw: Bytes) -> Result<Self::Value>;

    /// Encode a value for storage.
    fn encode(&self, value: Self::Value) -> Result<Bytes>;
}

/// UTF-8 text codec.
///
/// Bytes that are not valid UTF-8 decode to the empty string rather than
/// failing, so binary entries in a text tree compare as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Codec;

impl Codec for Utf8Codec {
    type Value = String;

    fn decode(&self, raw: Bytes) -> Result<String> {
        match String::from_utf8(raw.to_vec()) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::debug!(len = raw.len(), "undecodable value read as empty: {}", e);
                Ok(String::new())
            }
        }
    }

    fn encode(&self, value: String) -> Result<Bytes> {
        Ok(Bytes::from(value))
    }
}

/// CBOR codec for any serde type.
pub struct CborCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> CborCodec<T> {
    /// Create a codec for `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for CborCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CborCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for CborCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CborCodec")
    }
}

impl<T: Serialize + DeserializeOwned> Codec for CborCodec<T> {
    type Value = T;

    fn decode(&self, raw: Bytes) -> Result<T> {
        ciborium::from_reader(raw.as_ref()).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn encode(&self, value: T) -> Result<Bytes> {
        let mut buf = Vec::new();
        ciborium::into_writer(&value, &mut buf).map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(Bytes::from(buf))
    }
}

/// A byte store viewed through a [`Codec`].
///
/// ```rust
/// use std::collections::HashMap;
/// use bytes::Bytes;
/// use keyrecon_store::{CodecStore, ReadStore, Utf8Codec};
///
/// let raw: HashMap<String, Bytes> = [
///     ("a.txt".to_string(), Bytes::from_static(b"hello")),
///     ("b.bin".to_string(), Bytes::from_static(&[0xff, 0xfe])),
/// ]
/// .into_iter()
/// .collect();
///
/// let text = CodecStore::new(raw, Utf8Codec);
/// assert_eq!(text.read(&"a.txt".to_string()).unwrap(), "hello");
/// assert_eq!(text.read(&"b.bin".to_string()).unwrap(), "");
/// ```
pub struct CodecStore<S, C> {
    inner: S,
    codec: C,
}

impl<S, C> CodecStore<S, C>
where
    S: ReadStore<Value = Bytes>,
    C: Codec,
{
    /// Wrap a byte store with `codec`.
    pub fn new(inner: S, codec: C) -> Self {
        Self { inner, codec }
    }

    /// Borrow the byte store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap into the byte store.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, C> ReadStore for CodecStore<S, C>
where
    S: ReadStore<Value = Bytes>,
    C: Codec,
{
    type Key = S::Key;
    type Value = C::Value;

    fn keys(&self) -> Result<Vec<S::Key>> {
        self.inner.keys()
    }

    fn contains(&self, key: &S::Key) -> Result<bool> {
        self.inner.contains(key)
    }

    fn read(&self, key: &S::Key) -> Result<C::Value> {
        self.codec.decode(self.inner.read(key)?)
    }

    fn len(&self) -> Result<usize> {
        self.inner.len()
    }
}

impl<S, C> Store for CodecStore<S, C>
where
    S: Store<Value = Bytes>,
    C: Codec,
{
    fn write(&mut self, key: &S::Key, value: C::Value) -> Result<()> {
        let raw = self.codec.encode(value)?;
        self.inner.write(key, raw)
    }

    fn delete(&mut self, key: &S::Key) -> Result<()> {
        self.inner.delete(key)
    }
}

impl<S, C> FsBacked for CodecStore<S, C>
where
    S: FsBacked<Value = Bytes>,
    C: Codec,
{
    fn local_path(&self, key: &S::Key) -> Result<PathBuf> {
        self.inner.local_path(key)
    }
}

impl<S, C> Timestamped for CodecStore<S, C>
where
    S: Timestamped<Value = Bytes>,
    C: Codec,
{
    fn modified(&self, key: &S::Key) -> Result<SystemTime> {
        self.inner.modified(key)
    }
}
