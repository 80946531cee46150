//! # KeyRecon Core
//!
//! Pure primitives for KeyRecon: per-key decisions, reconciliation policies,
//! and run statistics.
//!
//! This crate contains no I/O, no storage, no logging. It is pure computation
//! over whatever comparable summaries ("key infos") the caller extracts from
//! its stores.
//!
//! ## Key Types
//!
//! - [`KeyDecision`] - What to do with one key: copy, skip, or delete
//! - [`Policy`] - Decides a [`KeyDecision`] from `(key, target_info, source_info)`
//! - [`DefaultPolicy`] - The built-in named policies
//! - [`ReconcileStats`] - Aggregate counters for one reconciliation run
//! - [`ContentHash`] - Blake3 digest used for content-based comparison
//!
//! ## Policies
//!
//! Any closure of the right shape is a policy:
//!
//! ```rust
//! use keyrecon_core::{CoreError, KeyDecision, Policy};
//!
//! let only_a = |key: &&str, _t: Option<&i32>, s: Option<&i32>| -> Result<KeyDecision, CoreError> {
//!     Ok(if *key == "a" && s.is_some() { KeyDecision::Copy } else { KeyDecision::Skip })
//! };
//!
//! assert_eq!(only_a.decide(&"a", None, Some(&1)).unwrap(), KeyDecision::Copy);
//! assert_eq!(only_a.decide(&"b", None, Some(&1)).unwrap(), KeyDecision::Skip);
//! ```

pub mod decision;
pub mod error;
pub mod hash;
pub mod policy;
pub mod stats;

pub use decision::KeyDecision;
pub use error::CoreError;
pub use hash::ContentHash;
pub use policy::{
    always_update, if_different, missing_only, newer, newer_if_timestamped, prefer_target,
    DefaultPolicy, Policy,
};
pub use stats::ReconcileStats;
