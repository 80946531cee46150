//! Reference scenarios with known outcomes.
//!
//! Each scenario fixes a target, a source, a policy, and optionally a key
//! subset, together with the target contents and stats a correct driver must
//! produce.

use std::collections::{BTreeMap, HashMap, HashSet};

use keyrecon_core::{CoreError, DefaultPolicy, KeyDecision, ReconcileStats};
use keyrecon_sync::{reconcile, Identity};
use serde::Serialize;

/// How a scenario decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioPolicy {
    /// One of the built-in policies.
    Named(DefaultPolicy),
    /// Copy everything the source has, delete everything it lacks.
    Mirror,
}

/// A reference scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Human-readable name.
    pub name: &'static str,
    pub target: &'static [(&'static str, i32)],
    pub source: &'static [(&'static str, i32)],
    pub policy: ScenarioPolicy,
    pub keys: Option<&'static [&'static str]>,
    /// Target contents after the run.
    pub expected_target: &'static [(&'static str, i32)],
    /// `(examined, updated, added, deleted, unchanged)`.
    pub expected_stats: (u64, u64, u64, u64, u64),
}

/// Result of running one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    pub stats: ReconcileStats,
    pub target: BTreeMap<String, i32>,
}

/// Get all reference scenarios.
pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "copy if different",
            target: &[("a", 1), ("b", 2)],
            source: &[("a", 10), ("c", 30)],
            policy: ScenarioPolicy::Named(DefaultPolicy::PreferSource),
            keys: None,
            expected_target: &[("a", 10), ("b", 2), ("c", 30)],
            expected_stats: (3, 1, 1, 0, 1),
        },
        Scenario {
            name: "prefer target",
            target: &[("a", 1), ("b", 2)],
            source: &[("a", 10), ("c", 30)],
            policy: ScenarioPolicy::Named(DefaultPolicy::PreferTarget),
            keys: None,
            expected_target: &[("a", 1), ("b", 2), ("c", 30)],
            expected_stats: (3, 0, 1, 0, 2),
        },
        Scenario {
            name: "always update rewrites equal values",
            target: &[("a", 1), ("b", 2)],
            source: &[("a", 1), ("c", 3)],
            policy: ScenarioPolicy::Named(DefaultPolicy::AlwaysUpdate),
            keys: None,
            expected_target: &[("a", 1), ("b", 2), ("c", 3)],
            expected_stats: (3, 1, 1, 0, 1),
        },
        Scenario {
            name: "newer wins",
            target: &[("f1", 100), ("f2", 300)],
            source: &[("f1", 200), ("f2", 200), ("f3", 100)],
            policy: ScenarioPolicy::Named(DefaultPolicy::Newer),
            keys: None,
            expected_target: &[("f1", 200), ("f2", 300), ("f3", 100)],
            expected_stats: (3, 1, 1, 0, 1),
        },
        Scenario {
            name: "mirror deletes",
            target: &[("a", 1), ("b", 2), ("c", 3)],
            source: &[("a", 10), ("d", 40)],
            policy: ScenarioPolicy::Mirror,
            keys: None,
            expected_target: &[("a", 10), ("d", 40)],
            expected_stats: (4, 1, 1, 2, 0),
        },
        Scenario {
            name: "restricted key subset",
            target: &[("a", 1), ("b", 2), ("c", 3)],
            source: &[("a", 10), ("b", 20), ("d", 40)],
            policy: ScenarioPolicy::Named(DefaultPolicy::PreferSource),
            keys: Some(&["a", "c", "d", "absent"]),
            expected_target: &[("a", 10), ("b", 2), ("c", 3), ("d", 40)],
            expected_stats: (3, 1, 1, 0, 1),
        },
        Scenario {
            name: "empty stores",
            target: &[],
            source: &[],
            policy: ScenarioPolicy::Named(DefaultPolicy::PreferSource),
            keys: None,
            expected_target: &[],
            expected_stats: (0, 0, 0, 0, 0),
        },
    ]
}

fn mirror(_: &String, t: Option<&i32>, s: Option<&i32>) -> Result<KeyDecision, CoreError> {
    Ok(match (t, s) {
        (Some(_), None) => KeyDecision::Delete,
        (_, Some(_)) => KeyDecision::Copy,
        (None, None) => KeyDecision::Skip,
    })
}

/// Run one scenario and compare against its expectations.
pub fn run_scenario(scenario: &Scenario) -> keyrecon_sync::Result<ScenarioOutcome> {
    let to_map = |pairs: &[(&str, i32)]| -> HashMap<String, i32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    };
    let mut target = to_map(scenario.target);
    let source = to_map(scenario.source);
    let keys: Option<HashSet<String>> = scenario
        .keys
        .map(|ks| ks.iter().map(|k| k.to_string()).collect());

    let stats = match scenario.policy {
        ScenarioPolicy::Named(policy) => {
            reconcile(&mut target, &source, policy, Identity, keys.as_ref())?
        }
        ScenarioPolicy::Mirror => {
            let policy = |k: &String, t: Option<&i32>, s: Option<&i32>| mirror(k, t, s);
            reconcile(&mut target, &source, policy, Identity, keys.as_ref())?
        }
    };

    let (examined, updated, added, deleted, unchanged) = scenario.expected_stats;
    let expected_stats = ReconcileStats {
        examined,
        updated,
        added,
        deleted,
        unchanged,
    };
    let passed = stats == expected_stats && target == to_map(scenario.expected_target);

    Ok(ScenarioOutcome {
        name: scenario.name.to_string(),
        passed,
        stats,
        target: target.into_iter().collect(),
    })
}

/// Run every reference scenario.
pub fn verify_all_scenarios() -> Vec<ScenarioOutcome> {
    all_scenarios()
        .iter()
        .map(|s| {
            run_scenario(s).unwrap_or_else(|_| ScenarioOutcome {
                name: s.name.to_string(),
                passed: false,
                stats: ReconcileStats::default(),
                target: BTreeMap::new(),
            })
        })
        .collect()
}
