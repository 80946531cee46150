//! The per-key outcome of a policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the driver does with one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDecision {
    /// Write the source value into the target.
    Copy,
    /// Leave the target untouched.
    Skip,
    /// Remove the key from the target.
    Delete,
}

impl KeyDecision {
    /// Whether this decision mutates the target.
    pub fn mutates(&self) -> bool {
        !matches!(self, KeyDecision::Skip)
    }
}

impl fmt::Display for KeyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyDecision::Copy => "copy",
            KeyDecision::Skip => "skip",
            KeyDecision::Delete => "delete",
        };
        f.write_str(s)
    }
}
