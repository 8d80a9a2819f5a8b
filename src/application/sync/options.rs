//! Sync Options
//!
//! Policy switches applied to every dispatched batch.

/// Options for the sync use case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Stream only the affected paths when the batch allows it
    pub incremental: bool,
    /// Append the elapsed time to every "synced" event
    pub show_sync_time: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            incremental: true,
            show_sync_time: false,
        }
    }
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub fn with_show_sync_time(mut self, show: bool) -> Self {
        self.show_sync_time = show;
        self
    }
}
