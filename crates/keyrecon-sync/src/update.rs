//! Convenience wrappers: fixed configurations of the driver.

use std::collections::HashSet;

use keyrecon_core::{
    always_update, if_different, missing_only, newer_if_timestamped, CoreError, DefaultPolicy,
    KeyDecision, Policy, ReconcileStats,
};
use keyrecon_store::{FsBacked, ReadStore, Store, Timestamped};

use crate::driver::{reconcile, reconcile_with};
use crate::error::Result;
use crate::info::{FileTimestamp, HashInfo, Identity, KeyFn, ModifiedTime, ValueInfo};

/// Reconcile raw values with `policy`.
pub fn update_with_policy<T, S, P>(
    target: &mut T,
    source: &S,
    policy: P,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    S: ReadStore<Key = T::Key, Value = T::Value>,
    P: Policy<T::Key, T::Value>,
{
    reconcile(target, source, policy, Identity, keys_to_consider)
}

/// Copy every source entry whose value differs from the target's.
pub fn update_if_different<T, S>(
    target: &mut T,
    source: &S,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    T::Value: PartialEq,
    S: ReadStore<Key = T::Key, Value = T::Value>,
{
    let policy = |k: &T::Key, t: Option<&T::Value>, s: Option<&T::Value>| if_different(k, t, s);
    reconcile(target, source, policy, Identity, keys_to_consider)
}

/// Copy every source entry, equal or not.
pub fn update_all<T, S>(
    target: &mut T,
    source: &S,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    S: ReadStore<Key = T::Key, Value = T::Value>,
{
    let policy = |k: &T::Key, t: Option<&T::Value>, s: Option<&T::Value>| always_update(k, t, s);
    reconcile(target, source, policy, Identity, keys_to_consider)
}

/// Copy only the source entries the target lacks.
pub fn update_missing_only<T, S>(
    target: &mut T,
    source: &S,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    S: ReadStore<Key = T::Key, Value = T::Value>,
{
    let policy = |k: &T::Key, t: Option<&T::Value>, s: Option<&T::Value>| missing_only(k, t, s);
    reconcile(target, source, policy, Identity, keys_to_consider)
}

/// Copy entries whose source timestamp is newer.
///
/// Timestamps come from lookup functions rather than the stores, e.g. an
/// external index. A key present on both sides with a missing timestamp on
/// either side cannot be compared and is skipped. Keys the target lacks are
/// copied.
pub fn update_newer<T, S, U, FT, FS>(
    target: &mut T,
    source: &S,
    target_timestamp: FT,
    source_timestamp: FS,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    S: ReadStore<Key = T::Key, Value = T::Value>,
    U: PartialOrd,
    FT: Fn(&T::Key) -> Option<U>,
    FS: Fn(&T::Key) -> Option<U>,
{
    let policy = |k: &T::Key, t: Option<&Option<U>>, s: Option<&Option<U>>| {
        newer_if_timestamped(k, t, s)
    };
    reconcile_with(
        target,
        source,
        policy,
        KeyFn(target_timestamp),
        KeyFn(source_timestamp),
        keys_to_consider,
    )
}

/// Copy entries whose content hash differs.
///
/// `hash_function` is applied to the values read from both stores.
pub fn update_by_content_hash<T, S, H, I>(
    target: &mut T,
    source: &S,
    hash_function: H,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    S: ReadStore<Key = T::Key, Value = T::Value>,
    H: Fn(&T::Value) -> I,
    I: PartialEq,
{
    let policy = |k: &T::Key, t: Option<&I>, s: Option<&I>| -> std::result::Result<KeyDecision, CoreError> {
        if_different(k, t, s)
    };
    let key_info = ValueInfo(|_: &T::Key, v: &T::Value| hash_function(v));
    reconcile(target, source, policy, key_info, keys_to_consider)
}

/// [`update_by_content_hash`] with Blake3 over the value bytes.
pub fn update_by_blake3<T, S>(
    target: &mut T,
    source: &S,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    T::Value: AsRef<[u8]>,
    S: ReadStore<Key = T::Key, Value = T::Value>,
{
    reconcile(
        target,
        source,
        DefaultPolicy::ContentHash,
        HashInfo,
        keys_to_consider,
    )
}

/// Copy entries whose store-tracked modification time is newer.
pub fn update_by_timestamp<T, S>(
    target: &mut T,
    source: &S,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store + Timestamped,
    S: Timestamped<Key = T::Key, Value = T::Value>,
{
    reconcile(
        target,
        source,
        DefaultPolicy::Newer,
        ModifiedTime,
        keys_to_consider,
    )
}

/// Copy files whose local modification time is newer.
pub fn update_files_by_timestamp<T, S>(
    target: &mut T,
    source: &S,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store + FsBacked,
    S: FsBacked<Key = T::Key, Value = T::Value>,
{
    reconcile(
        target,
        source,
        DefaultPolicy::Newer,
        FileTimestamp,
        keys_to_consider,
    )
}
