//! Host File System Port
//!
//! The only host-side question the sync engine asks: does a path still exist?

use std::path::Path;

pub trait HostFs: Send + Sync {
    /// Whether `path` exists on the host (without following a final symlink).
    fn exists(&self, path: &Path) -> bool;
}
