//! Filesystem watching

mod notify_adapter;

pub use notify_adapter::{ChangeAccumulator, NotifyWatchAdapter, NotifyWatcher, POLL_INTERVAL};
