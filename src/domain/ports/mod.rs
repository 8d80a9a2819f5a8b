//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_runner;
pub mod host_fs;
pub mod sync_events;
pub mod target_resolver;
pub mod transport;
pub mod watch_adapter;

pub use command_runner::{CommandRunner, ExitResult, ProcessEvent, StdinChannel};
pub use host_fs::HostFs;
pub use sync_events::{NoopEventSink, SyncEvent, SyncEventSink};
pub use target_resolver::TargetResolver;
pub use transport::Transport;
pub use watch_adapter::{
    ChangeCallback, WatchAdapter, WatchSettings, Watcher, WatcherState, DEBOUNCE_MS,
    MAX_DELAY_MS,
};
