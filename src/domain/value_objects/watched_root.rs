//! Watched root value object

use std::fmt;
use std::path::{Path, PathBuf};

/// An absolute host directory observed by one watcher.
///
/// Always slash-terminated so that stripping it from an absolute path yields
/// a root-relative path without a leading separator, and so that rsync copies
/// the directory's contents rather than the directory itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchedRoot(String);

impl WatchedRoot {
    /// Create a root from an already-resolved host path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let mut root = path.as_ref().to_string_lossy().into_owned();
        if !root.ends_with('/') {
            root.push('/');
        }
        Self(root)
    }

    /// The slash-terminated root.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The root as a host path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Strip the root prefix from an absolute path.
    ///
    /// Returns `None` for paths outside the root (and for the root itself).
    pub fn relative<'a>(&self, absolute: &'a str) -> Option<&'a str> {
        absolute
            .strip_prefix(self.0.as_str())
            .filter(|rel| !rel.is_empty())
    }

    /// Host path of a root-relative path.
    pub fn join(&self, rel_path: &str) -> PathBuf {
        Path::new(&self.0).join(rel_path)
    }
}

impl fmt::Display for WatchedRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join a root-relative path onto a guest directory.
pub fn guest_join(guestpath: &str, rel_path: &str) -> String {
    format!(
        "{}/{}",
        guestpath.trim_end_matches('/'),
        rel_path.trim_start_matches('/')
    )
}
