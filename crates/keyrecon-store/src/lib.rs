//! # KeyRecon Store
//!
//! Storage abstraction for KeyRecon. Provides the capability traits the
//! reconciliation driver consumes, plus in-memory, filesystem, and SQLite
//! implementations and a few composable wrappers.
//!
//! ## Overview
//!
//! A store is anything that can enumerate its keys and read entries by key
//! ([`ReadStore`]). A store that can also be written to and deleted from is a
//! [`Store`]. Sources only need to be readable; targets must be writable.
//!
//! ## Key Types
//!
//! - [`ReadStore`] / [`Store`] - The capability traits
//! - [`FsBacked`] - Stores whose entries live in local files
//! - [`Timestamped`] - Stores that track a last-modified time per entry
//! - [`MemoryStore`] - In-memory store (the traits are also implemented for
//!   `HashMap` and `BTreeMap`)
//! - [`FileStore`] - Files under a root directory, keyed by relative path
//! - [`SqliteStore`] - Key/value table in a SQLite database
//! - [`FilteredStore`], [`CachedKeys`], [`CodecStore`] - Wrappers
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use keyrecon_store::{ReadStore, Store};
//!
//! let mut store: HashMap<String, i32> = HashMap::new();
//! store.write(&"a".to_string(), 1).unwrap();
//!
//! assert!(store.contains(&"a".to_string()).unwrap());
//! assert_eq!(store.read(&"a".to_string()).unwrap(), 1);
//! assert!(store.read(&"b".to_string()).is_err());
//! ```
//!
//! ## Design Notes
//!
//! - **Absence is an error on read/delete**: both fail with [`StoreError::NotFound`]
//! - **Key enumeration has set semantics**: no duplicates, no guaranteed order
//! - **No retries**: I/O and database errors surface unchanged

pub mod cached;
pub mod codec;
pub mod error;
pub mod file;
pub mod filter;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use cached::CachedKeys;
pub use codec::{CborCodec, Codec, CodecStore, Utf8Codec};
pub use error::{Result, StoreError};
pub use file::FileStore;
pub use filter::FilteredStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{FsBacked, ReadStore, Store, Timestamped};
