//! Reusable reconciliation sessions.
//!
//! A [`Reconciler`] bundles a policy, an extractor, an optional key
//! restriction, and a [`ReconcileConfig`], and can be run against any number
//! of store pairs.

use std::collections::HashSet;
use std::hash::Hash;

use keyrecon_core::{DefaultPolicy, Policy, ReconcileStats};
use keyrecon_store::{ReadStore, Store};
use serde::{Deserialize, Serialize};

use crate::driver::{self, ReconcilePlan};
use crate::error::Result;
use crate::info::{Identity, KeyInfo};

/// Run options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Evaluate every key but leave the target untouched.
    pub dry_run: bool,
    /// Emit a debug event for every key decision.
    pub log_decisions: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            log_decisions: true,
        }
    }
}

/// Result of [`Reconciler::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport<K> {
    /// Counters of the run (predicted ones for a dry run).
    pub stats: ReconcileStats,
    /// The evaluated actions; only set for a dry run.
    pub plan: Option<ReconcilePlan<K>>,
}

impl<K> ReconcileReport<K> {
    /// Whether this report comes from a dry run.
    pub fn is_dry_run(&self) -> bool {
        self.plan.is_some()
    }
}

/// A configured reconciliation.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use keyrecon_core::DefaultPolicy;
/// use keyrecon_sync::{ReconcileConfig, Reconciler};
///
/// let mut target: HashMap<String, i32> = HashMap::new();
/// let source: HashMap<String, i32> = [("a".to_string(), 1)].into_iter().collect();
///
/// let preview = Reconciler::new(DefaultPolicy::MissingOnly).with_config(ReconcileConfig {
///     dry_run: true,
///     ..ReconcileConfig::default()
/// });
/// let report = preview.run(&mut target, &source).unwrap();
///
/// assert_eq!(report.stats.added, 1);
/// assert!(target.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Reconciler<K, P = DefaultPolicy, X = Identity> {
    policy: P,
    key_info: X,
    keys: Option<HashSet<K>>,
    config: ReconcileConfig,
}

impl<K> Default for Reconciler<K> {
    fn default() -> Self {
        Self::new(DefaultPolicy::default())
    }
}

impl<K, P> Reconciler<K, P> {
    /// Create a reconciler comparing raw values with `policy`.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            key_info: Identity,
            keys: None,
            config: ReconcileConfig::default(),
        }
    }
}

impl<K, P, X> Reconciler<K, P, X> {
    /// Compare entries through `key_info` instead.
    pub fn with_key_info<Y>(self, key_info: Y) -> Reconciler<K, P, Y> {
        Reconciler {
            policy: self.policy,
            key_info,
            keys: self.keys,
            config: self.config,
        }
    }

    /// Set the run options.
    pub fn with_config(mut self, config: ReconcileConfig) -> Self {
        self.config = config;
        self
    }

    /// The run options.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// The policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<K: Eq + Hash, P, X> Reconciler<K, P, X> {
    /// Only consider these keys.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.keys = Some(keys.into_iter().collect());
        self
    }

    /// The key restriction, if any.
    pub fn keys(&self) -> Option<&HashSet<K>> {
        self.keys.as_ref()
    }

    /// Reconcile `target` with `source`.
    ///
    /// In dry-run mode the target is only read, and the report carries the
    /// plan.
    pub fn run<T, S>(&self, target: &mut T, source: &S) -> Result<ReconcileReport<K>>
    where
        T: Store<Key = K>,
        S: ReadStore<Key = K, Value = T::Value>,
        X: KeyInfo<T> + KeyInfo<S, Info = <X as KeyInfo<T>>::Info>,
        P: Policy<K, <X as KeyInfo<T>>::Info>,
    {
        tracing::debug!(
            dry_run = self.config.dry_run,
            restricted = self.keys.is_some(),
            "starting reconciliation"
        );

        if self.config.dry_run {
            let plan = driver::evaluate(
                &*target,
                source,
                &self.policy,
                &self.key_info,
                &self.key_info,
                self.keys.as_ref(),
                self.config.log_decisions,
            )?;
            return Ok(ReconcileReport {
                stats: plan.stats,
                plan: Some(plan),
            });
        }

        let stats = driver::apply(
            target,
            source,
            &self.policy,
            &self.key_info,
            &self.key_info,
            self.keys.as_ref(),
            self.config.log_decisions,
        )?;
        Ok(ReconcileReport { stats, plan: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::ValueInfo;
    use keyrecon_core::KeyDecision;
    use std::collections::HashMap;

    fn stores() -> (HashMap<String, i32>, HashMap<String, i32>) {
        let target = [("a".to_string(), 1), ("b".to_string(), 2)]
            .into_iter()
            .collect();
        let source = [("a".to_string(), 10), ("c".to_string(), 30)]
            .into_iter()
            .collect();
        (target, source)
    }

    #[test]
    fn test_default_reconciler_copies_differences() {
        let (mut target, source) = stores();
        let report = Reconciler::default().run(&mut target, &source).unwrap();

        assert!(!report.is_dry_run());
        assert_eq!(target["a"], 10);
        assert_eq!(target["c"], 30);
        assert_eq!(report.stats.changed(), 2);
    }

    #[test]
    fn test_dry_run_leaves_target() {
        let (mut target, source) = stores();
        let before = target.clone();

        let reconciler = Reconciler::new(DefaultPolicy::AlwaysUpdate).with_config(ReconcileConfig {
            dry_run: true,
            log_decisions: false,
        });
        let report = reconciler.run(&mut target, &source).unwrap();

        assert_eq!(target, before);
        let plan = report.plan.unwrap();
        assert_eq!(plan.stats, report.stats);
        assert_eq!(report.stats.updated, 1);
        assert_eq!(report.stats.added, 1);
        assert!(plan
            .actions
            .iter()
            .any(|a| a.key == "c" && a.decision == KeyDecision::Copy && !a.in_target));
    }

    #[test]
    fn test_with_keys_and_key_info() {
        let (mut target, source) = stores();
        let sign = ValueInfo(|_: &String, v: &i32| v.signum());

        let report = Reconciler::new(DefaultPolicy::PreferSource)
            .with_key_info(sign)
            .with_keys(["a".to_string(), "b".to_string()])
            .run(&mut target, &source)
            .unwrap();

        // 1 and 10 share a sign; "c" is outside the restriction.
        assert_eq!(target["a"], 1);
        assert!(!target.contains_key("c"));
        assert_eq!(report.stats.examined, 2);
        assert_eq!(report.stats.unchanged, 2);
    }

    #[test]
    fn test_config_from_json() {
        let config: ReconcileConfig = serde_json::from_str(r#"{"dry_run": true}"#).unwrap();
        assert!(config.dry_run);
        assert!(config.log_decisions);

        let config: ReconcileConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReconcileConfig::default());
    }
}
