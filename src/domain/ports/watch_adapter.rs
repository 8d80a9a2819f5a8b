//! Watch Adapter Port
//!
//! Detects filesystem changes beneath one root and reports them as batches.

use std::time::Duration;

use crate::domain::value_objects::{ChangeBatch, ExcludePattern, WatchedRoot};
use crate::error::ReflectResult;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Longest a pending change waits for the root to go quiet, in milliseconds
pub const MAX_DELAY_MS: u64 = 1000;

/// Callback invoked with every batch.
///
/// Delivery is serialized per root: a root never has two batches in flight.
pub type ChangeCallback = Box<dyn FnMut(ChangeBatch) + Send + 'static>;

/// Options for one watcher.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    /// Paths matching any of these are never reported
    pub excludes: Vec<ExcludePattern>,
    /// Poll the filesystem instead of using native notifications
    pub force_polling: bool,
    /// Quiet period before pending changes are delivered
    pub debounce: Duration,
    /// Deadline, counted from the first pending change, after which the
    /// batch is delivered even if events keep arriving
    pub max_delay: Duration,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            force_polling: false,
            debounce: Duration::from_millis(DEBOUNCE_MS),
            max_delay: Duration::from_millis(MAX_DELAY_MS),
        }
    }
}

/// Lifecycle state of a watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Initializing,
    Running,
    Stopped,
}

/// A watcher bound to a single root.
pub trait Watcher: Send {
    fn start(&mut self) -> ReflectResult<()>;

    /// Stop delivering batches. A batch already being dispatched finishes.
    fn stop(&mut self);

    fn state(&self) -> WatcherState;
}

/// Creates watchers.
pub trait WatchAdapter: Send + Sync {
    fn watch(
        &self,
        root: &WatchedRoot,
        settings: WatchSettings,
        on_change: ChangeCallback,
    ) -> ReflectResult<Box<dyn Watcher>>;
}
