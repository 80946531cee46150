//! # KeyRecon Sync
//!
//! One-directional reconciliation of two key-value stores.
//!
//! ## Overview
//!
//! The driver walks the union of the keys of a *target* and a *source*
//! store, summarizes each side's entry with a [`KeyInfo`] extractor, asks a
//! [`Policy`](keyrecon_core::Policy) what to do, and applies the answer to the
//! target. The source is never modified.
//!
//! ## Key Properties
//!
//! - **Synchronous**: each key is processed to completion before the next
//! - **Order-independent**: policies see one key at a time
//! - **Fail-fast**: the first error aborts the pass, with no rollback
//! - **Restrictable**: a key subset bounds what is read, written, and counted
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use keyrecon_core::{CoreError, KeyDecision};
//! use keyrecon_sync::{reconcile, Identity};
//!
//! let mut target: HashMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
//! let source: HashMap<&str, i32> = [("a", 10), ("d", 40)].into_iter().collect();
//!
//! // Mirror the source exactly.
//! let mirror = |_: &&str, t: Option<&i32>, s: Option<&i32>| -> Result<KeyDecision, CoreError> {
//!     Ok(match (t, s) {
//!         (_, Some(_)) => KeyDecision::Copy,
//!         (Some(_), None) => KeyDecision::Delete,
//!         (None, None) => KeyDecision::Skip,
//!     })
//! };
//!
//! let stats = reconcile(&mut target, &source, mirror, Identity, None).unwrap();
//! assert_eq!(target, source);
//! assert_eq!((stats.updated, stats.added, stats.deleted), (1, 1, 2));
//! ```
//!
//! ## Parallelism
//!
//! The driver itself is sequential. Split the keys into disjoint subsets,
//! run one pass per subset, and sum the stats with `+=`.

pub mod driver;
pub mod error;
pub mod info;
pub mod session;
pub mod timestamp;
pub mod update;

pub use driver::{plan, plan_with, reconcile, reconcile_with, PlannedAction, ReconcilePlan};
pub use error::{Result, SyncError};
pub use info::{
    FileTimestamp, HashInfo, Identity, KeyFn, KeyInfo, ModifiedTime, StoreInfo, TryValueInfo,
    ValueInfo,
};
pub use session::{ReconcileConfig, ReconcileReport, Reconciler};
pub use timestamp::local_file_timestamp;
pub use update::{
    update_all, update_by_blake3, update_by_content_hash, update_by_timestamp,
    update_files_by_timestamp, update_if_different, update_missing_only, update_newer,
    update_with_policy,
};
