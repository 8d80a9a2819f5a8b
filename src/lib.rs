//! Reflect - incremental host to remote folder mirroring
//!
//! Reflect watches host directories and mirrors every change to remote
//! machines over rsync and ssh. Changed paths are streamed to rsync's
//! `--files-from` list instead of rescanning the whole tree, and removals
//! can be sent as plain `rm`/`rmdir` commands.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{SyncOptions, SyncUseCase, WatchOptions, WatchUseCase};
pub use config::Config;
pub use error::{ReflectError, ReflectResult};
