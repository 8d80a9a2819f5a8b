//! Removal planning
//!
//! Works out which remote directories became empty because of a batch of
//! removals, and in what order they can be removed.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::ports::HostFs;
use crate::domain::value_objects::{guest_join, WatchedRoot};

/// Ordered map from a directory's relative path to its remote path.
///
/// Inserting a key that is already present moves it to the end. Iteration
/// follows insertion order, which is the order directories must be removed in.
#[derive(Debug, Default, Clone)]
pub struct PendingRemovals {
    slots: Vec<Option<(String, String)>>,
    index: HashMap<String, usize>,
}

impl PendingRemovals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `rel_dir`, or move it to the end if already present.
    pub fn insert_or_move_to_end(&mut self, rel_dir: String, remote_dir: String) {
        if let Some(slot) = self.index.remove(&rel_dir) {
            self.slots[slot] = None;
        }
        self.index.insert(rel_dir.clone(), self.slots.len());
        self.slots.push(Some((rel_dir, remote_dir)));
    }

    pub fn contains(&self, rel_dir: &str) -> bool {
        self.index.contains_key(rel_dir)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// `(relative, remote)` pairs in removal order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .flatten()
            .map(|(rel, remote)| (rel.as_str(), remote.as_str()))
    }

    /// Relative directory paths in removal order.
    pub fn relative_dirs(&self) -> Vec<String> {
        self.iter().map(|(rel, _)| rel.to_string()).collect()
    }

    /// Remote directory paths in removal order.
    pub fn into_remote_dirs(self) -> Vec<String> {
        self.slots
            .into_iter()
            .flatten()
            .map(|(_, remote)| remote)
            .collect()
    }
}

/// Result of planning one batch of removals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    /// Remote paths of the removed files, in input order
    pub files: Vec<String>,
    /// Remote directories to remove, deepest first
    pub dirs: Vec<String>,
}

/// Plans remote removals against the current state of the host.
pub struct RemovalPlanner<'a> {
    host_fs: &'a dyn HostFs,
}

impl<'a> RemovalPlanner<'a> {
    pub fn new(host_fs: &'a dyn HostFs) -> Self {
        Self { host_fs }
    }

    /// Collect the ancestors of every removed path that no longer exist on
    /// the host.
    ///
    /// A directory that still exists keeps other files and must stay on the
    /// remote side too. Walking each path bottom-up and moving every missing
    /// ancestor to the end keeps descendants ahead of their ancestors, no
    /// matter which removed path revealed them first.
    pub fn pending_removals(
        &self,
        removed: &[String],
        host_root: &WatchedRoot,
        guestpath: &str,
    ) -> PendingRemovals {
        let mut dirs = PendingRemovals::new();

        for rel_path in removed {
            let mut parent = Path::new(rel_path.as_str()).parent();
            while let Some(dir) = parent {
                let rel_dir = dir.to_string_lossy();
                if rel_dir.is_empty() || rel_dir == "/" {
                    break;
                }
                if !self.host_fs.exists(&host_root.join(&rel_dir)) {
                    let rel_dir = rel_dir.into_owned();
                    let remote_dir = guest_join(guestpath, &rel_dir);
                    dirs.insert_or_move_to_end(rel_dir, remote_dir);
                }
                parent = dir.parent();
            }
        }

        dirs
    }

    /// Remote file paths plus the ordered remote directory removals.
    pub fn plan(
        &self,
        removed: &[String],
        host_root: &WatchedRoot,
        guestpath: &str,
    ) -> RemovalPlan {
        let dirs = self.pending_removals(removed, host_root, guestpath);
        tracing::debug!(
            files = removed.len(),
            dirs = ?dirs.relative_dirs(),
            "planned remote removals"
        );

        RemovalPlan {
            files: removed.iter().map(|rel| guest_join(guestpath, rel)).collect(),
            dirs: dirs.into_remote_dirs(),
        }
    }
}
