//! Change batch value object

use super::WatchedRoot;

/// Paths reported by the watch adapter for one root at one point in time.
///
/// The three sets are disjoint. Paths are absolute when they come from the
/// adapter and root-relative after [`ChangeBatch::relative_to`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    modified: Vec<String>,
    added: Vec<String>,
    removed: Vec<String>,
}

impl ChangeBatch {
    pub fn new(modified: Vec<String>, added: Vec<String>, removed: Vec<String>) -> Self {
        Self {
            modified,
            added,
            removed,
        }
    }

    pub fn modified(&self) -> &[String] {
        &self.modified
    }

    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn has_changes(&self) -> bool {
        !self.modified.is_empty() || !self.added.is_empty()
    }

    pub fn has_removals(&self) -> bool {
        !self.removed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_changes() && !self.has_removals()
    }

    /// Modified then added paths, in that order.
    pub fn changed(&self) -> impl Iterator<Item = &String> {
        self.modified.iter().chain(self.added.iter())
    }

    /// Strip the root prefix from every path.
    ///
    /// Paths outside the root are dropped with a warning; the adapter only
    /// reports paths beneath the root it watches.
    pub fn relative_to(&self, root: &WatchedRoot) -> ChangeBatch {
        let strip = |paths: &[String]| -> Vec<String> {
            paths
                .iter()
                .filter_map(|path| {
                    let rel = root.relative(path);
                    if rel.is_none() {
                        tracing::warn!(%root, path, "change outside watched root");
                    }
                    rel.map(str::to_string)
                })
                .collect()
        };

        ChangeBatch {
            modified: strip(&self.modified),
            added: strip(&self.added),
            removed: strip(&self.removed),
        }
    }
}
