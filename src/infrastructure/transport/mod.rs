//! Transport implementations
//!
//! - `RsyncTransport` - rsync over ssh, with ssh-driven remote removals

mod rsync;

pub use rsync::{RsyncTransport, DEFAULT_RSYNC_ARGS};
