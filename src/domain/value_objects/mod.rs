//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod change_batch;
mod exclude_pattern;
mod transport_command;
mod watched_root;

pub use change_batch::ChangeBatch;
pub use exclude_pattern::{is_excluded, ExcludePattern};
pub use transport_command::{CommandKind, StdinMode, TransportCommand};
pub use watched_root::{guest_join, WatchedRoot};
