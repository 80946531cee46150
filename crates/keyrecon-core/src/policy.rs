//! Reconciliation policies.
//!
//! A policy maps `(key, target_info, source_info)` to a [`KeyDecision`], where
//! `None` means the key is absent from that store. Policies must not look at
//! other keys: the driver evaluates keys in no particular order.
//!
//! None of the built-in policies ever returns [`KeyDecision::Delete`].
//! Deletion always requires a custom policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decision::KeyDecision;
use crate::error::CoreError;

/// A per-key decision function.
///
/// Implemented for [`DefaultPolicy`] and for every closure or function of the
/// shape `Fn(&K, Option<&I>, Option<&I>) -> Result<KeyDecision, CoreError>`.
pub trait Policy<K: ?Sized, I: ?Sized> {
    /// Decide what to do with `key`.
    fn decide(
        &self,
        key: &K,
        target_info: Option<&I>,
        source_info: Option<&I>,
    ) -> Result<KeyDecision, CoreError>;
}

impl<K: ?Sized, I: ?Sized, F> Policy<K, I> for F
where
    F: Fn(&K, Option<&I>, Option<&I>) -> Result<KeyDecision, CoreError>,
{
    fn decide(
        &self,
        key: &K,
        target_info: Option<&I>,
        source_info: Option<&I>,
    ) -> Result<KeyDecision, CoreError> {
        self(key, target_info, source_info)
    }
}

/// The built-in named policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicy {
    /// Copy whenever the source has the key, even if the values are equal.
    AlwaysUpdate,
    /// Copy when the source has the key and its info differs from the target's.
    #[default]
    #[serde(alias = "if_different")]
    PreferSource,
    /// Only fill keys the target lacks; never overwrite.
    PreferTarget,
    /// Same rule as [`DefaultPolicy::PreferTarget`].
    MissingOnly,
    /// Copy new keys, or keys whose source info compares greater.
    Newer,
    /// Same rule as [`DefaultPolicy::PreferSource`], meant for content-hash infos.
    ContentHash,
}

impl DefaultPolicy {
    /// All built-in policies.
    pub const ALL: [DefaultPolicy; 6] = [
        DefaultPolicy::AlwaysUpdate,
        DefaultPolicy::PreferSource,
        DefaultPolicy::PreferTarget,
        DefaultPolicy::MissingOnly,
        DefaultPolicy::Newer,
        DefaultPolicy::ContentHash,
    ];

    /// The snake_case name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            DefaultPolicy::AlwaysUpdate => "always_update",
            DefaultPolicy::PreferSource => "prefer_source",
            DefaultPolicy::PreferTarget => "prefer_target",
            DefaultPolicy::MissingOnly => "missing_only",
            DefaultPolicy::Newer => "newer",
            DefaultPolicy::ContentHash => "content_hash",
        }
    }
}

impl fmt::Display for DefaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DefaultPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always_update" => Ok(DefaultPolicy::AlwaysUpdate),
            "prefer_source" | "if_different" => Ok(DefaultPolicy::PreferSource),
            "prefer_target" => Ok(DefaultPolicy::PreferTarget),
            "missing_only" => Ok(DefaultPolicy::MissingOnly),
            "newer" => Ok(DefaultPolicy::Newer),
            "content_hash" => Ok(DefaultPolicy::ContentHash),
            other => Err(CoreError::UnknownPolicy(other.to_string())),
        }
    }
}

impl<K: ?Sized, I: PartialOrd + ?Sized> Policy<K, I> for DefaultPolicy {
    fn decide(
        &self,
        key: &K,
        target_info: Option<&I>,
        source_info: Option<&I>,
    ) -> Result<KeyDecision, CoreError> {
        match self {
            DefaultPolicy::AlwaysUpdate => always_update(key, target_info, source_info),
            DefaultPolicy::PreferSource | DefaultPolicy::ContentHash => {
                if_different(key, target_info, source_info)
            }
            DefaultPolicy::PreferTarget => prefer_target(key, target_info, source_info),
            DefaultPolicy::MissingOnly => missing_only(key, target_info, source_info),
            DefaultPolicy::Newer => newer(key, target_info, source_info),
        }
    }
}

/// Copy whenever the source has the key.
pub fn always_update<K: ?Sized, I: ?Sized>(
    _key: &K,
    _target_info: Option<&I>,
    source_info: Option<&I>,
) -> Result<KeyDecision, CoreError> {
    Ok(match source_info {
        Some(_) => KeyDecision::Copy,
        None => KeyDecision::Skip,
    })
}

/// Copy when the source has the key and the infos differ.
pub fn if_different<K: ?Sized, I: PartialEq + ?Sized>(
    _key: &K,
    target_info: Option<&I>,
    source_info: Option<&I>,
) -> Result<KeyDecision, CoreError> {
    Ok(match source_info {
        Some(s) if target_info != Some(s) => KeyDecision::Copy,
        _ => KeyDecision::Skip,
    })
}

/// Copy only into gaps: the target lacks the key and the source has it.
pub fn prefer_target<K: ?Sized, I: ?Sized>(
    _key: &K,
    target_info: Option<&I>,
    source_info: Option<&I>,
) -> Result<KeyDecision, CoreError> {
    Ok(match (target_info, source_info) {
        (None, Some(_)) => KeyDecision::Copy,
        _ => KeyDecision::Skip,
    })
}

/// Alias of [`prefer_target`].
pub fn missing_only<K: ?Sized, I: ?Sized>(
    key: &K,
    target_info: Option<&I>,
    source_info: Option<&I>,
) -> Result<KeyDecision, CoreError> {
    prefer_target(key, target_info, source_info)
}

/// Copy new keys, or keys whose source info is strictly greater.
///
/// Incomparable infos (e.g. NaN) are skipped.
pub fn newer<K: ?Sized, I: PartialOrd + ?Sized>(
    _key: &K,
    target_info: Option<&I>,
    source_info: Option<&I>,
) -> Result<KeyDecision, CoreError> {
    Ok(match (target_info, source_info) {
        (_, None) => KeyDecision::Skip,
        (None, Some(_)) => KeyDecision::Copy,
        (Some(t), Some(s)) if s > t => KeyDecision::Copy,
        (Some(_), Some(_)) => KeyDecision::Skip,
    })
}

/// [`newer`] for entries whose timestamp may be missing.
///
/// A key present on both sides is only copied when both timestamps exist and
/// the source's is greater. Keys the target lacks are always copied.
pub fn newer_if_timestamped<K: ?Sized, T: PartialOrd>(
    _key: &K,
    target_info: Option<&Option<T>>,
    source_info: Option<&Option<T>>,
) -> Result<KeyDecision, CoreError> {
    Ok(match (target_info, source_info) {
        (_, None) => KeyDecision::Skip,
        (None, Some(_)) => KeyDecision::Copy,
        (Some(Some(t)), Some(Some(s))) if s > t => KeyDecision::Copy,
        (Some(_), Some(_)) => KeyDecision::Skip,
    })
}
