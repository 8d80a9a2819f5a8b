//! Transport Port
//!
//! Builds the command lines that mirror a target's folder to its machine.

use crate::domain::entities::SyncTarget;
use crate::domain::value_objects::TransportCommand;

/// Source of the four commands a sync target can issue.
///
/// Implementations only build argv; running them is the
/// [`CommandRunner`](super::CommandRunner)'s job.
pub trait Transport: Send + Sync {
    /// Mirror the whole host root to the guest path. Takes no input.
    fn full_mirror(&self, target: &SyncTarget) -> TransportCommand;

    /// Mirror only the root-relative paths written to stdin.
    fn incremental_mirror(&self, target: &SyncTarget) -> TransportCommand;

    /// Remove the absolute guest files written to stdin.
    fn remote_file_remove(&self, target: &SyncTarget) -> TransportCommand;

    /// Remove the absolute guest directories written to stdin, in order.
    fn remote_dir_remove(&self, target: &SyncTarget) -> TransportCommand;

    /// Whether removals may be sent on their own instead of forcing a full
    /// mirror.
    fn supports_pure_delete(&self) -> bool;
}
