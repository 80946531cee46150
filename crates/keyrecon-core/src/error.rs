//! Error types for KeyRecon Core.

use thiserror::Error;

/// Errors raised by policies and key-info extractors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("policy failed on key {key}: {message}")]
    PolicyFailure { key: String, message: String },

    #[error("key info extraction failed on key {key}: {message}")]
    ExtractorFailure { key: String, message: String },

    #[error("unknown policy: {0}")]
    UnknownPolicy(String),
}

impl CoreError {
    /// Build a [`CoreError::PolicyFailure`] for `key`.
    pub fn policy<K: std::fmt::Debug + ?Sized>(key: &K, message: impl Into<String>) -> Self {
        CoreError::PolicyFailure {
            key: format!("{:?}", key),
            message: message.into(),
        }
    }

    /// Build a [`CoreError::ExtractorFailure`] for `key`.
    pub fn extractor<K: std::fmt::Debug + ?Sized>(key: &K, message: impl Into<String>) -> Self {
        CoreError::ExtractorFailure {
            key: format!("{:?}", key),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::policy(&"b", "refusing");
        assert_eq!(err.to_string(), "policy failed on key \"b\": refusing");

        let err = CoreError::extractor(&7u32, "no timestamp");
        assert_eq!(
            err.to_string(),
            "key info extraction failed on key 7: no timestamp"
        );

        let err = CoreError::UnknownPolicy("sideways".into());
        assert_eq!(err.to_string(), "unknown policy: sideways");
    }
}
