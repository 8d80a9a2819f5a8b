//! Watch options

use std::time::Duration;

use crate::application::sync::SyncOptions;
use crate::domain::ports::DEBOUNCE_MS;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Policy applied to every dispatched batch
    pub sync: SyncOptions,
    /// Poll the filesystem instead of using native notifications
    pub force_polling: bool,
    /// Quiet period before a batch is delivered
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            sync: SyncOptions::default(),
            force_polling: false,
            debounce: Duration::from_millis(DEBOUNCE_MS),
        }
    }
}

impl WatchOptions {
    pub fn new(sync: SyncOptions) -> Self {
        Self {
            sync,
            ..Self::default()
        }
    }

    /// Set forced polling
    pub fn with_force_polling(mut self, force_polling: bool) -> Self {
        self.force_polling = force_polling;
        self
    }

    /// Set the debounce window
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}
