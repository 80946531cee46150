//! # KeyRecon
//!
//! Policy-driven reconciliation of key-value stores.
//!
//! ## Overview
//!
//! KeyRecon brings a *target* store in line with a *source* store, one key at
//! a time. For each key a pluggable policy decides whether to copy the source
//! entry over, delete the target entry, or leave it alone, based on a
//! summary of each side (the value, a timestamp, a content hash).
//!
//! - **Stores**: anything implementing [`ReadStore`] / [`Store`]: plain maps,
//!   directories ([`FileStore`]), SQLite tables ([`SqliteStore`])
//! - **Policies**: the named [`DefaultPolicy`] strategies or any closure
//! - **Extractors**: [`KeyInfo`] implementations turning entries into
//!   comparable summaries
//! - **Stats**: every run reports [`ReconcileStats`]
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use keyrecon::{update_with_policy, DefaultPolicy};
//!
//! let mut target: HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
//! let source: HashMap<&str, i32> = [("a", 10), ("c", 30)].into_iter().collect();
//!
//! let stats = update_with_policy(&mut target, &source, DefaultPolicy::PreferTarget, None)?;
//!
//! assert_eq!(target[&"a"], 1);
//! assert_eq!(target[&"c"], 30);
//! assert_eq!(stats.added, 1);
//! # Ok::<(), keyrecon::SyncError>(())
//! ```
//!
//! ## Re-exports
//!
//! - `keyrecon::core` - Decisions, policies, stats
//! - `keyrecon::store` - Store traits and implementations
//! - `keyrecon::sync` - Driver, extractors, wrappers

pub mod dirs;
pub mod error;

// Re-export component crates
pub use keyrecon_core as core;
pub use keyrecon_store as store;
pub use keyrecon_sync as sync;

pub use dirs::sync_directories;
pub use error::{Error, Result};

pub use keyrecon_core::{ContentHash, CoreError, DefaultPolicy, KeyDecision, Policy, ReconcileStats};
pub use keyrecon_store::{
    CachedKeys, CborCodec, CodecStore, FileStore, FilteredStore, FsBacked, MemoryStore, ReadStore,
    SqliteStore, Store, StoreError, Timestamped, Utf8Codec,
};
pub use keyrecon_sync::{
    local_file_timestamp, plan, reconcile, reconcile_with, update_all, update_by_blake3,
    update_by_content_hash, update_by_timestamp, update_files_by_timestamp, update_if_different,
    update_missing_only, update_newer, update_with_policy, FileTimestamp, HashInfo, Identity,
    KeyInfo, ModifiedTime, ReconcileConfig, ReconcilePlan, ReconcileReport, Reconciler, SyncError,
    ValueInfo,
};
