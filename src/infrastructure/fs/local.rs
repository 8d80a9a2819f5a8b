//! Local File System Implementation
//!
//! Implements the HostFs port for the local disk.

use std::path::Path;

use crate::domain::ports::HostFs;

/// Host file system backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHostFs;

impl LocalHostFs {
    pub fn new() -> Self {
        Self
    }
}

impl HostFs for LocalHostFs {
    fn exists(&self, path: &Path) -> bool {
        // A dangling symlink still occupies its name
        std::fs::symlink_metadata(path).is_ok()
    }
}
