//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key is not present in the store.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Key cannot be stored here (malformed, or excluded by a filter).
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Value encoding/decoding error.
    #[error("codec error: {0}")]
    Codec(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Backend cannot serve the request (e.g. poisoned lock, missing root).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Build a [`StoreError::NotFound`] for `key`.
    pub fn not_found<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        StoreError::NotFound(format!("{:?}", key))
    }

    /// Build a [`StoreError::InvalidKey`] for `key`.
    pub fn invalid_key<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        StoreError::InvalidKey(format!("{:?}", key))
    }

    /// Whether this error reports an absent key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
