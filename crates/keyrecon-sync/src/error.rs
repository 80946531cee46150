//! Error types for the sync module.

use keyrecon_core::CoreError;
use keyrecon_store::StoreError;
use thiserror::Error;

/// Errors that can occur during a reconciliation run.
///
/// The first failure aborts the run. Mutations already applied to the target
/// are kept.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A store operation failed (missing key, I/O, database).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A policy or key-info extractor failed.
    #[error("{0}")]
    Core(#[from] CoreError),
}

impl SyncError {
    /// Whether this error reports an absent key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::Store(e) if e.is_not_found())
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
