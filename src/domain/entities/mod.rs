//! Domain Entities

mod machine;
mod sync_target;

pub use machine::{Machine, SshInfo};
pub use sync_target::SyncTarget;
