//! Sync Result
//!
//! Outcome of one batch for one target.

use crate::domain::services::SyncStrategy;
use crate::error::ReflectError;

/// What happened to one (batch, target) unit of work.
#[derive(Debug)]
pub struct SyncReport {
    /// Machine the target is bound to
    pub machine: String,
    /// Guest path of the target
    pub guestpath: String,
    /// Strategy taken; `None` when the target was skipped
    pub strategy: Option<SyncStrategy>,
    /// Every step that failed, in the order the steps ran
    pub errors: Vec<ReflectError>,
}

impl SyncReport {
    pub(crate) fn skipped(machine: &str, guestpath: &str) -> Self {
        Self {
            machine: machine.to_string(),
            guestpath: guestpath.to_string(),
            strategy: None,
            errors: Vec::new(),
        }
    }

    /// The machine had no identity, so nothing was attempted.
    pub fn is_skipped(&self) -> bool {
        self.strategy.is_none()
    }

    /// Every attempted step succeeded.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
