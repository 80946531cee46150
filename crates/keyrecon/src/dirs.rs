//! Directory-to-directory reconciliation.

use std::path::Path;

use keyrecon_core::DefaultPolicy;
use keyrecon_store::FileStore;
use keyrecon_sync::{
    FileTimestamp, HashInfo, Identity, ReconcileConfig, ReconcileReport, Reconciler,
};

use crate::error::Result;

/// Bring the files under `target_dir` in line with those under `source_dir`.
///
/// Keys are `/`-separated paths relative to each root. The comparison follows
/// the policy: [`DefaultPolicy::Newer`] compares file modification times,
/// [`DefaultPolicy::ContentHash`] compares Blake3 digests, and the others
/// compare raw bytes. `target_dir` is created if missing; `source_dir` must
/// exist.
///
/// ```no_run
/// use keyrecon::{sync_directories, DefaultPolicy, ReconcileConfig};
///
/// let report = sync_directories("backup", "docs", DefaultPolicy::Newer, &ReconcileConfig::default())?;
/// println!("{}", report.stats);
/// # Ok::<(), keyrecon::Error>(())
/// ```
pub fn sync_directories(
    target_dir: impl AsRef<Path>,
    source_dir: impl AsRef<Path>,
    policy: DefaultPolicy,
    config: &ReconcileConfig,
) -> Result<ReconcileReport<String>> {
    let source = FileStore::open(source_dir.as_ref())?;
    let mut target = FileStore::create(target_dir.as_ref())?;

    tracing::info!(
        target_dir = %target.root().display(),
        source_dir = %source.root().display(),
        %policy,
        "syncing directories"
    );

    let reconciler = Reconciler::new(policy).with_config(config.clone());
    let report = match policy {
        DefaultPolicy::Newer => reconciler
            .with_key_info(FileTimestamp)
            .run(&mut target, &source)?,
        DefaultPolicy::ContentHash => reconciler
            .with_key_info(HashInfo)
            .run(&mut target, &source)?,
        _ => reconciler
            .with_key_info(Identity)
            .run(&mut target, &source)?,
    };
    Ok(report)
}
