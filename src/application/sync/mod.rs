//! Sync Module
//!
//! Dispatches change batches to the targets bound to a root.
//!
//! ## Structure
//!
//! - `options` - Policy switches (`SyncOptions`)
//! - `result` - Per-target outcome (`SyncReport`)
//! - `transport` - Mirror and removal steps for one target
//! - `use_case` - Strategy dispatch (`SyncUseCase`)

mod options;
mod result;
mod transport;
mod use_case;

pub use options::SyncOptions;
pub use result::SyncReport;
pub use use_case::SyncUseCase;
