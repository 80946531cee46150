//! Proptest generators for property-based testing.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use keyrecon_core::{DefaultPolicy, KeyDecision};

/// Generate a key from a small alphabet, so target and source overlap.
pub fn key() -> impl Strategy<Value = String> {
    (0u8..16).prop_map(|i| format!("k{}", i))
}

/// Generate a value from a small range, so equal values are common.
pub fn value() -> impl Strategy<Value = i32> {
    0i32..4
}

/// Generate a map-backed store of up to `max_len` entries.
pub fn store(max_len: usize) -> impl Strategy<Value = HashMap<String, i32>> {
    prop::collection::hash_map(key(), value(), 0..=max_len)
}

/// Generate a key subset, possibly naming keys neither store holds.
pub fn key_subset() -> impl Strategy<Value = HashSet<String>> {
    prop::collection::hash_set((0u8..24).prop_map(|i| format!("k{}", i)), 0..10)
}

/// Generate a built-in policy.
pub fn default_policy() -> impl Strategy<Value = DefaultPolicy> {
    prop::sample::select(DefaultPolicy::ALL.to_vec())
}

/// Generate a decision.
pub fn decision() -> impl Strategy<Value = KeyDecision> {
    prop_oneof![
        Just(KeyDecision::Copy),
        Just(KeyDecision::Skip),
        Just(KeyDecision::Delete),
    ]
}

/// A target/source pair with a policy to reconcile them by.
#[derive(Debug, Clone)]
pub struct StorePair {
    pub target: HashMap<String, i32>,
    pub source: HashMap<String, i32>,
    pub policy: DefaultPolicy,
}

impl StorePair {
    /// Keys held by either store.
    pub fn universe(&self) -> HashSet<String> {
        self.target
            .keys()
            .chain(self.source.keys())
            .cloned()
            .collect()
    }
}

impl Arbitrary for StorePair {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (store(12), store(12), default_policy())
            .prop_map(|(target, source, policy)| StorePair {
                target,
                source,
                policy,
            })
            .boxed()
    }
}
