//! Error types for the facade.

use keyrecon_core::CoreError;
use keyrecon_store::StoreError;
use keyrecon_sync::SyncError;
use thiserror::Error;

/// Any error KeyRecon can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Policy, extractor, or policy-name error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Reconciliation error.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}

impl Error {
    /// Whether this error reports an absent key.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(e) => e.is_not_found(),
            Error::Sync(e) => e.is_not_found(),
            Error::Core(_) => false,
        }
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
