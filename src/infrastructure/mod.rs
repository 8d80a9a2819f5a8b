//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process/` - child processes with non-blocking stdin
//! - `transport/` - rsync and ssh command lines
//! - `watch/` - notify-backed watch adapter
//! - `events/` - console and NDJSON event sinks
//! - `fs/` - host file system and home expansion

pub mod events;
pub mod fs;
pub mod process;
pub mod resolver;
pub mod signal;
pub mod transport;
pub mod watch;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::LocalHostFs;
pub use process::SystemCommandRunner;
pub use resolver::ConfigTargetResolver;
pub use signal::interrupt_channel;
pub use transport::RsyncTransport;
pub use watch::NotifyWatchAdapter;
