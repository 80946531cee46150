//! The reconciliation driver.
//!
//! One pass brings a target store in line with a source store:
//!
//! 1. Compute the key universe: every key of either store, or, when a key
//!    subset is given, the subset's keys that exist in at least one store.
//! 2. For each key, extract the info of each side that has it.
//! 3. Ask the policy for a [`KeyDecision`].
//! 4. Apply it to the target and count it.
//!
//! The first error aborts the pass. Keys processed before it keep their
//! mutations; nothing is rolled back.

use std::collections::HashSet;

use keyrecon_core::{KeyDecision, Policy, ReconcileStats};
use keyrecon_store::{ReadStore, Store};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::info::KeyInfo;

/// A decision the driver would apply for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction<K> {
    /// The key.
    pub key: K,
    /// What the policy decided.
    pub decision: KeyDecision,
    /// Whether the target held the key when it was evaluated.
    pub in_target: bool,
}

/// The outcome of a dry run: every evaluated key plus the stats a real run
/// would report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePlan<K> {
    /// One entry per evaluated key.
    pub actions: Vec<PlannedAction<K>>,
    /// Predicted counters.
    pub stats: ReconcileStats,
}

impl<K> ReconcilePlan<K> {
    /// Actions that would write to or delete from the target.
    pub fn changes(&self) -> impl Iterator<Item = &PlannedAction<K>> {
        self.actions.iter().filter(|a| a.decision.mutates())
    }

    /// Whether applying the plan would leave the target untouched.
    pub fn is_noop(&self) -> bool {
        self.stats.changed() == 0
    }
}

/// Reconcile `target` with `source`, using one extractor for both sides.
///
/// `keys_to_consider` restricts the pass; keys outside it are never read,
/// written, deleted, or counted.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use keyrecon_core::DefaultPolicy;
/// use keyrecon_sync::{reconcile, Identity};
///
/// let mut target: HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
/// let source: HashMap<&str, i32> = [("a", 10), ("c", 30)].into_iter().collect();
///
/// let stats = reconcile(&mut target, &source, DefaultPolicy::PreferSource, Identity, None).unwrap();
///
/// assert_eq!(target[&"a"], 10);
/// assert_eq!(target[&"c"], 30);
/// assert_eq!((stats.examined, stats.updated, stats.added, stats.unchanged), (3, 1, 1, 1));
/// ```
pub fn reconcile<T, S, P, X>(
    target: &mut T,
    source: &S,
    policy: P,
    key_info: X,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    S: ReadStore<Key = T::Key, Value = T::Value>,
    X: KeyInfo<T> + KeyInfo<S, Info = <X as KeyInfo<T>>::Info>,
    P: Policy<T::Key, <X as KeyInfo<T>>::Info>,
{
    apply(target, source, &policy, &key_info, &key_info, keys_to_consider, true)
}

/// Reconcile `target` with `source`, using a separate extractor per side.
///
/// Both extractors must produce the same info type.
pub fn reconcile_with<T, S, P, XT, XS>(
    target: &mut T,
    source: &S,
    policy: P,
    target_info: XT,
    source_info: XS,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcileStats>
where
    T: Store,
    S: ReadStore<Key = T::Key, Value = T::Value>,
    XT: KeyInfo<T>,
    XS: KeyInfo<S, Info = XT::Info>,
    P: Policy<T::Key, XT::Info>,
{
    apply(
        target,
        source,
        &policy,
        &target_info,
        &source_info,
        keys_to_consider,
        true,
    )
}

/// Evaluate a reconciliation without touching the target.
///
/// The returned plan's stats equal those [`reconcile`] would return on the
/// same inputs.
pub fn plan<T, S, P, X>(
    target: &T,
    source: &S,
    policy: P,
    key_info: X,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcilePlan<T::Key>>
where
    T: ReadStore,
    S: ReadStore<Key = T::Key>,
    X: KeyInfo<T> + KeyInfo<S, Info = <X as KeyInfo<T>>::Info>,
    P: Policy<T::Key, <X as KeyInfo<T>>::Info>,
{
    evaluate(target, source, &policy, &key_info, &key_info, keys_to_consider, true)
}

/// [`plan`] with a separate extractor per side.
pub fn plan_with<T, S, P, XT, XS>(
    target: &T,
    source: &S,
    policy: P,
    target_info: XT,
    source_info: XS,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<ReconcilePlan<T::Key>>
where
    T: ReadStore,
    S: ReadStore<Key = T::Key>,
    XT: KeyInfo<T>,
    XS: KeyInfo<S, Info = XT::Info>,
    P: Policy<T::Key, XT::Info>,
{
    evaluate(
        target,
        source,
        &policy,
        &target_info,
        &source_info,
        keys_to_consider,
        true,
    )
}

/// The keys a pass visits, each once.
fn key_universe<T, S>(
    target: &T,
    source: &S,
    keys_to_consider: Option<&HashSet<T::Key>>,
) -> Result<Vec<T::Key>>
where
    T: ReadStore + ?Sized,
    S: ReadStore<Key = T::Key> + ?Sized,
{
    match keys_to_consider {
        Some(subset) => {
            let mut keys = Vec::with_capacity(subset.len());
            for key in subset {
                if target.contains(key)? || source.contains(key)? {
                    keys.push(key.clone());
                }
            }
            Ok(keys)
        }
        None => {
            let mut keys = target.keys()?;
            let mut seen: HashSet<T::Key> = keys.iter().cloned().collect();
            for key in source.keys()? {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
            Ok(keys)
        }
    }
}

/// Decide one key.
fn decide<T, S, P, XT, XS>(
    target: &T,
    source: &S,
    policy: &P,
    target_info: &XT,
    source_info: &XS,
    key: &T::Key,
) -> Result<(KeyDecision, bool)>
where
    T: ReadStore + ?Sized,
    S: ReadStore<Key = T::Key> + ?Sized,
    XT: KeyInfo<T> + ?Sized,
    XS: KeyInfo<S, Info = XT::Info> + ?Sized,
    P: Policy<T::Key, XT::Info> + ?Sized,
{
    let in_target = target.contains(key)?;
    let t_info = if in_target {
        Some(target_info.info(target, key)?)
    } else {
        None
    };
    let s_info = if source.contains(key)? {
        Some(source_info.info(source, key)?)
    } else {
        None
    };

    let decision = policy.decide(key, t_info.as_ref(), s_info.as_ref())?;
    Ok((decision, in_target))
}

pub(crate) fn apply<T, S, P, XT, XS>(
    target: &mut T,
    source: &S,
    policy: &P,
    target_info: &XT,
    source_info: &XS,
    keys_to_consider: Option<&HashSet<T::Key>>,
    log_decisions: bool,
) -> Result<ReconcileStats>
where
    T: Store + ?Sized,
    S: ReadStore<Key = T::Key, Value = T::Value> + ?Sized,
    XT: KeyInfo<T> + ?Sized,
    XS: KeyInfo<S, Info = XT::Info> + ?Sized,
    P: Policy<T::Key, XT::Info> + ?Sized,
{
    let mut stats = ReconcileStats::new();

    for key in key_universe(&*target, source, keys_to_consider)? {
        let (decision, in_target) =
            decide(&*target, source, policy, target_info, source_info, &key)?;

        match decision {
            KeyDecision::Copy => {
                let value = source.read(&key)?;
                target.write(&key, value)?;
            }
            KeyDecision::Delete if in_target => target.delete(&key)?,
            KeyDecision::Delete | KeyDecision::Skip => {}
        }

        if log_decisions {
            tracing::debug!(key = ?key, %decision, in_target, "applied decision");
        }
        stats.record(decision, in_target);
    }

    tracing::info!(%stats, "reconciliation complete");
    Ok(stats)
}

pub(crate) fn evaluate<T, S, P, XT, XS>(
    target: &T,
    source: &S,
    policy: &P,
    target_info: &XT,
    source_info: &XS,
    keys_to_consider: Option<&HashSet<T::Key>>,
    log_decisions: bool,
) -> Result<ReconcilePlan<T::Key>>
where
    T: ReadStore + ?Sized,
    S: ReadStore<Key = T::Key> + ?Sized,
    XT: KeyInfo<T> + ?Sized,
    XS: KeyInfo<S, Info = XT::Info> + ?Sized,
    P: Policy<T::Key, XT::Info> + ?Sized,
{
    let mut stats = ReconcileStats::new();
    let mut actions = Vec::new();

    for key in key_universe(target, source, keys_to_consider)? {
        let (decision, in_target) = decide(target, source, policy, target_info, source_info, &key)?;

        if log_decisions {
            tracing::debug!(key = ?key, %decision, in_target, "planned decision");
        }
        stats.record(decision, in_target);
        actions.push(PlannedAction {
            key,
            decision,
            in_target,
        });
    }

    tracing::info!(%stats, dry_run = true, "reconciliation planned");
    Ok(ReconcilePlan { actions, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{Identity, KeyFn, TryValueInfo, ValueInfo};
    use keyrecon_core::{CoreError, DefaultPolicy};
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashMap};

    fn map(pairs: &[(&'static str, i32)]) -> HashMap<&'static str, i32> {
        pairs.iter().copied().collect()
    }

    fn subset(keys: &[&'static str]) -> HashSet<&'static str> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_default_policy_example() {
        let mut target = map(&[("a", 1), ("b", 2)]);
        let source = map(&[("a", 10), ("c", 30)]);

        let stats =
            reconcile(&mut target, &source, DefaultPolicy::PreferSource, Identity, None).unwrap();

        assert_eq!(target, map(&[("a", 10), ("b", 2), ("c", 30)]));
        assert_eq!(stats.examined, 3);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.deleted, 0);
    }

    #[test]
    fn test_prefer_target_keeps_existing() {
        let mut target = map(&[("a", 1), ("b", 2)]);
        let source = map(&[("a", 10), ("c", 30)]);

        let stats =
            reconcile(&mut target, &source, DefaultPolicy::PreferTarget, Identity, None).unwrap();

        assert_eq!(target, map(&[("a", 1), ("b", 2), ("c", 30)]));
        assert_eq!((stats.updated, stats.added, stats.unchanged), (0, 1, 2));
    }

    #[test]
    fn test_always_update_counts_identical_copies() {
        let mut target = map(&[("a", 1)]);
        let source = map(&[("a", 1)]);

        let stats =
            reconcile(&mut target, &source, DefaultPolicy::AlwaysUpdate, Identity, None).unwrap();

        assert_eq!(stats.updated, 1);
        assert_eq!(stats.unchanged, 0);
    }

    #[test]
    fn test_custom_delete_policy() {
        let mut target = map(&[("a", 1), ("b", 2), ("c", 3)]);
        let source = map(&[("a", 10), ("d", 40)]);

        let sync_all = |_: &&str, t: Option<&i32>, s: Option<&i32>| {
            Ok(match (t, s) {
                (_, Some(_)) => KeyDecision::Copy,
                (Some(_), None) => KeyDecision::Delete,
                (None, None) => KeyDecision::Skip,
            })
        };

        let stats = reconcile(&mut target, &source, sync_all, Identity, None).unwrap();

        assert_eq!(target, map(&[("a", 10), ("d", 40)]));
        assert_eq!(
            (stats.updated, stats.added, stats.deleted, stats.unchanged),
            (1, 1, 2, 0)
        );
    }

    #[test]
    fn test_delete_of_absent_key_is_counted() {
        let mut target = map(&[]);
        let source = map(&[("x", 1)]);

        let delete_everything =
            |_: &&str, _: Option<&i32>, _: Option<&i32>| Ok(KeyDecision::Delete);
        let stats = reconcile(&mut target, &source, delete_everything, Identity, None).unwrap();

        assert!(target.is_empty());
        assert_eq!(stats.deleted, 1);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_keys_to_consider_restricts_universe() {
        let mut target = map(&[("a", 1), ("b", 2)]);
        let source = map(&[("a", 10), ("b", 20), ("c", 30)]);
        let keys = subset(&["a", "c", "zzz"]);

        let stats = reconcile(
            &mut target,
            &source,
            DefaultPolicy::PreferSource,
            Identity,
            Some(&keys),
        )
        .unwrap();

        assert_eq!(target, map(&[("a", 10), ("b", 2), ("c", 30)]));
        assert_eq!(stats.examined, 2);
    }

    #[test]
    fn test_custom_key_info() {
        let mut target: HashMap<&str, String> =
            [("a", "Hello".to_string())].into_iter().collect();
        let source: HashMap<&str, String> = [("a", "hello".to_string()), ("b", "x".to_string())]
            .into_iter()
            .collect();

        let lower = ValueInfo(|_: &&str, v: &String| v.to_lowercase());
        let stats =
            reconcile(&mut target, &source, DefaultPolicy::PreferSource, lower, None).unwrap();

        assert_eq!(target[&"a"], "Hello");
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.added, 1);
    }

    #[test]
    fn test_asymmetric_extractors() {
        let mut target = map(&[("f1", 1), ("f2", 2)]);
        let source = map(&[("f1", 10), ("f2", 20), ("f3", 30)]);
        let target_ts: HashMap<&str, u64> = [("f1", 100), ("f2", 300)].into_iter().collect();
        let source_ts: HashMap<&str, u64> =
            [("f1", 200), ("f2", 200), ("f3", 100)].into_iter().collect();

        let stats = reconcile_with(
            &mut target,
            &source,
            DefaultPolicy::Newer,
            KeyFn(|k: &&str| target_ts[k]),
            KeyFn(|k: &&str| source_ts[k]),
            None,
        )
        .unwrap();

        assert_eq!(target, map(&[("f1", 10), ("f2", 2), ("f3", 30)]));
        assert_eq!((stats.updated, stats.unchanged, stats.added), (1, 1, 1));
    }

    #[test]
    fn test_policy_failure_propagates() {
        let mut target: BTreeMap<&str, i32> = BTreeMap::new();
        let source: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();

        let fail_on_b = |k: &&str, _: Option<&i32>, _: Option<&i32>| {
            if *k == "b" {
                Err(CoreError::policy(k, "refused"))
            } else {
                Ok(KeyDecision::Copy)
            }
        };

        let err = reconcile(&mut target, &source, fail_on_b, Identity, None).unwrap_err();
        assert!(matches!(
            err,
            crate::SyncError::Core(CoreError::PolicyFailure { .. })
        ));
        // "a" sorts first and was copied before "b" failed
        assert_eq!(target.get("a"), Some(&1));
        assert!(!target.contains_key("b"));
    }

    #[test]
    fn test_extractor_failure_propagates() {
        let mut target: BTreeMap<&str, i32> = BTreeMap::new();
        let source: BTreeMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3), ("d", 4)]
            .into_iter()
            .collect();

        let unreadable_c = TryValueInfo(|k: &&str, v: &i32| {
            if *k == "c" {
                Err(CoreError::extractor(k, "unreadable"))
            } else {
                Ok(*v)
            }
        });

        let err = reconcile(
            &mut target,
            &source,
            DefaultPolicy::PreferSource,
            unreadable_c,
            None,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            crate::SyncError::Core(CoreError::ExtractorFailure { .. })
        ));
        assert_eq!(target.get("a"), Some(&1));
        assert_eq!(target.get("b"), Some(&2));
        assert!(!target.contains_key("c"));
        assert!(!target.contains_key("d"));
    }

    #[test]
    fn test_plan_with_matches_reconcile_with() {
        let target = map(&[("f1", 1), ("f2", 2)]);
        let source = map(&[("f1", 10), ("f2", 20), ("f3", 30)]);
        let target_ts: HashMap<&str, u64> = [("f1", 100), ("f2", 300)].into_iter().collect();
        let source_ts: HashMap<&str, u64> =
            [("f1", 200), ("f2", 200), ("f3", 100)].into_iter().collect();

        let planned = plan_with(
            &target,
            &source,
            DefaultPolicy::Newer,
            KeyFn(|k: &&str| target_ts[k]),
            KeyFn(|k: &&str| source_ts[k]),
            None,
        )
        .unwrap();
        assert_eq!(target, map(&[("f1", 1), ("f2", 2)]));

        let mut applied = target.clone();
        let stats = reconcile_with(
            &mut applied,
            &source,
            DefaultPolicy::Newer,
            KeyFn(|k: &&str| target_ts[k]),
            KeyFn(|k: &&str| source_ts[k]),
            None,
        )
        .unwrap();

        assert_eq!(planned.stats, stats);
        let f2 = planned.actions.iter().find(|a| a.key == "f2").unwrap();
        assert_eq!(f2.decision, KeyDecision::Skip);
    }

    #[test]
    fn test_copy_without_source_fails() {
        let mut target = map(&[("a", 1)]);
        let source = map(&[]);

        let copy_everything = |_: &&str, _: Option<&i32>, _: Option<&i32>| Ok(KeyDecision::Copy);
        let err = reconcile(&mut target, &source, copy_everything, Identity, None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let target = map(&[("a", 1), ("b", 2)]);
        let source = map(&[("a", 10), ("c", 30)]);

        let plan = plan(&target, &source, DefaultPolicy::PreferSource, Identity, None).unwrap();

        assert_eq!(target, map(&[("a", 1), ("b", 2)]));
        assert_eq!(plan.actions.len(), 3);
        assert_eq!(plan.changes().count(), 2);
        assert!(!plan.is_noop());

        let a = plan.actions.iter().find(|a| a.key == "a").unwrap();
        assert_eq!(a.decision, KeyDecision::Copy);
        assert!(a.in_target);
    }

    #[test]
    fn test_empty_stores() {
        let mut target = map(&[]);
        let source = map(&[]);
        let stats =
            reconcile(&mut target, &source, DefaultPolicy::PreferSource, Identity, None).unwrap();
        assert_eq!(stats, ReconcileStats::default());
    }

    fn store_strategy() -> impl Strategy<Value = HashMap<u8, u8>> {
        prop::collection::hash_map(0u8..16, 0u8..4, 0..12)
    }

    proptest! {
        #[test]
        fn prop_stats_consistent(
            target in store_strategy(),
            source in store_strategy(),
            policy in prop::sample::select(DefaultPolicy::ALL.to_vec()),
        ) {
            let mut target = target;
            let stats = reconcile(&mut target, &source, policy, Identity, None).unwrap();
            prop_assert!(stats.is_consistent());
            let universe: HashSet<u8> = target.keys().chain(source.keys()).copied().collect();
            prop_assert_eq!(stats.examined as usize, universe.len());
        }

        #[test]
        fn prop_if_different_is_idempotent(
            target in store_strategy(),
            source in store_strategy(),
        ) {
            let mut target = target;
            reconcile(&mut target, &source, DefaultPolicy::PreferSource, Identity, None).unwrap();
            let again = reconcile(&mut target, &source, DefaultPolicy::PreferSource, Identity, None).unwrap();
            prop_assert_eq!(again.updated, 0);
            prop_assert_eq!(again.added, 0);
            for (k, v) in &source {
                prop_assert_eq!(target.get(k), Some(v));
            }
        }

        #[test]
        fn prop_plan_predicts_run(
            target in store_strategy(),
            source in store_strategy(),
            policy in prop::sample::select(DefaultPolicy::ALL.to_vec()),
        ) {
            let planned = plan(&target, &source, policy, Identity, None).unwrap();
            let mut target = target;
            let stats = reconcile(&mut target, &source, policy, Identity, None).unwrap();
            prop_assert_eq!(planned.stats, stats);
        }

        #[test]
        fn prop_restriction_bounds_examined(
            target in store_strategy(),
            source in store_strategy(),
            keys in prop::collection::hash_set(0u8..20, 0..8),
        ) {
            let before = target.clone();
            let mut target = target;
            let stats = reconcile(&mut target, &source, DefaultPolicy::AlwaysUpdate, Identity, Some(&keys)).unwrap();

            let expected = keys
                .iter()
                .filter(|k| before.contains_key(*k) || source.contains_key(*k))
                .count();
            prop_assert_eq!(stats.examined as usize, expected);
            for (k, v) in &before {
                if !keys.contains(k) {
                    prop_assert_eq!(target.get(k), Some(v));
                }
            }
        }
    }
}
