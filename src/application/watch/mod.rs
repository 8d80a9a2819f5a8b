//! Watch Use Case
//!
//! Owns one watcher per watched root and routes each root's batches to the
//! targets bound to it.
//!
//! ## Architecture
//!
//! - `WatchUseCase` - Groups targets by root, runs the initial sync, then
//!   watches until shutdown
//! - `WatchOptions` - Polling, debounce and sync policy
//!
//! ## Usage
//!
//! ```ignore
//! let use_case = WatchUseCase::new(adapter, sync);
//! use_case.announce(&targets);
//! use_case.initial_sync(&targets, &options.sync);
//! use_case.run(&targets, &options, shutdown_rx)?;
//! ```

mod options;
mod use_case;


pub use options::WatchOptions;
pub use use_case::{group_by_root, WatchUseCase};
