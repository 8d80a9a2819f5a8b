//! Target Resolver Port
//!
//! Supplies the configured sync targets and answers whether a machine is
//! currently addressable.

use crate::domain::entities::{Machine, SyncTarget};

pub trait TargetResolver: Send + Sync {
    /// Every configured target, in configuration order.
    fn sync_targets(&self) -> Vec<SyncTarget>;

    /// The machine's current identity, re-read on every call.
    ///
    /// `None` means the machine has no identity right now (e.g. it was torn
    /// down) and must be skipped silently.
    fn machine_identity(&self, machine: &Machine) -> Option<String>;
}
