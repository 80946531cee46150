//! Aggregate counters for a reconciliation run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

use crate::decision::KeyDecision;

/// Counters produced by one reconciliation run.
///
/// Invariant: `examined == updated + added + deleted + unchanged`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Keys evaluated by the policy.
    pub examined: u64,
    /// Copies onto keys that already existed in the target.
    pub updated: u64,
    /// Copies onto keys that were new to the target.
    pub added: u64,
    /// Delete decisions.
    pub deleted: u64,
    /// Skip decisions.
    pub unchanged: u64,
}

impl ReconcileStats {
    /// Field names, in the order they appear in [`ReconcileStats::as_map`].
    pub const FIELDS: [&'static str; 5] = ["examined", "updated", "added", "deleted", "unchanged"];

    /// Create zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one evaluated key.
    ///
    /// `in_target` is whether the key existed in the target before the action.
    pub fn record(&mut self, decision: KeyDecision, in_target: bool) {
        self.examined += 1;
        match decision {
            KeyDecision::Copy if in_target => self.updated += 1,
            KeyDecision::Copy => self.added += 1,
            KeyDecision::Delete => self.deleted += 1,
            KeyDecision::Skip => self.unchanged += 1,
        }
    }

    /// Whether `examined` equals the sum of the outcome counters.
    pub fn is_consistent(&self) -> bool {
        self.examined == self.updated + self.added + self.deleted + self.unchanged
    }

    /// Number of keys whose target entry was written or removed.
    pub fn changed(&self) -> u64 {
        self.updated + self.added + self.deleted
    }

    /// The counters as a name → count mapping.
    pub fn as_map(&self) -> BTreeMap<&'static str, u64> {
        Self::FIELDS
            .iter()
            .copied()
            .zip([
                self.examined,
                self.updated,
                self.added,
                self.deleted,
                self.unchanged,
            ])
            .collect()
    }
}

impl AddAssign for ReconcileStats {
    fn add_assign(&mut self, rhs: Self) {
        self.examined += rhs.examined;
        self.updated += rhs.updated;
        self.added += rhs.added;
        self.deleted += rhs.deleted;
        self.unchanged += rhs.unchanged;
    }
}

impl fmt::Display for ReconcileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "examined={} updated={} added={} deleted={} unchanged={}",
            self.examined, self.updated, self.added, self.deleted, self.unchanged
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut stats = ReconcileStats::new();
        stats.record(KeyDecision::Copy, true);
        stats.record(KeyDecision::Copy, false);
        stats.record(KeyDecision::Skip, true);
        stats.record(KeyDecision::Delete, true);
        stats.record(KeyDecision::Delete, false);

        assert_eq!(
            stats,
            ReconcileStats {
                examined: 5,
                updated: 1,
                added: 1,
                deleted: 2,
                unchanged: 1,
            }
        );
        assert!(stats.is_consistent());
        assert_eq!(stats.changed(), 4);
    }

    #[test]
    fn test_as_map_has_exactly_five_keys() {
        let stats = ReconcileStats {
            examined: 3,
            updated: 1,
            added: 1,
            deleted: 0,
            unchanged: 1,
        };
        let map = stats.as_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map["examined"], 3);
        assert_eq!(map["unchanged"], 1);
        assert_eq!(map["deleted"], 0);
    }

    #[test]
    fn test_add_assign() {
        let mut a = ReconcileStats {
            examined: 2,
            updated: 1,
            added: 0,
            deleted: 0,
            unchanged: 1,
        };
        a += ReconcileStats {
            examined: 1,
            updated: 0,
            added: 1,
            deleted: 0,
            unchanged: 0,
        };
        assert_eq!(a.examined, 3);
        assert_eq!(a.added, 1);
        assert!(a.is_consistent());
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(ReconcileStats::new()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["added", "deleted", "examined", "unchanged", "updated"]);
    }

    #[test]
    fn test_display() {
        let stats = ReconcileStats {
            examined: 3,
            updated: 1,
            added: 1,
            deleted: 0,
            unchanged: 1,
        };
        assert_eq!(
            stats.to_string(),
            "examined=3 updated=1 added=1 deleted=0 unchanged=1"
        );
    }
}
