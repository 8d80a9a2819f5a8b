//! Application Layer
//!
//! Use cases that orchestrate the sync flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `SyncUseCase` - Dispatches one change batch to the targets of a root
//! - `WatchUseCase` - Owns the watchers and blocks until shutdown
//!
//! ## Services
//!
//! - `stream_items` - Feeds paths to a running command without blocking

pub mod stream;
pub mod sync;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

pub use stream::{stream_items, LineFeeder};
pub use sync::{SyncOptions, SyncReport, SyncUseCase};
pub use watch::{group_by_root, WatchOptions, WatchUseCase};
