//! Sync strategy selection

use crate::domain::value_objects::ChangeBatch;

/// How one batch is mirrored to one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// Re-run the full mirror over the whole root
    Full,
    /// Stream only the affected paths
    Incremental,
}

/// Pick the strategy for a batch.
///
/// rsync cannot be told "delete this path and nothing else" through
/// `--files-from`, so unless the transport has separate remote-remove
/// commands any removal falls back to a full mirror.
pub fn select_strategy(incremental: bool, batch: &ChangeBatch, pure_delete: bool) -> SyncStrategy {
    if !incremental || (batch.has_removals() && !pure_delete) {
        SyncStrategy::Full
    } else {
        SyncStrategy::Incremental
    }
}
