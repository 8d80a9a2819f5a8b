//! Sync target entity

use std::sync::{Arc, OnceLock};

use crate::domain::value_objects::{ExcludePattern, WatchedRoot};

use super::Machine;

/// One folder mapping from a host root to a guest path on a machine.
///
/// Several targets may share a root, e.g. nested folder mappings or the same
/// folder mirrored to two machines.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    machine: Arc<Machine>,
    guestpath: String,
    hostpath: WatchedRoot,
    excludes: Vec<String>,
    auto: bool,
    matchers: OnceLock<Vec<ExcludePattern>>,
}

impl SyncTarget {
    pub fn new(machine: Arc<Machine>, guestpath: impl Into<String>, hostpath: WatchedRoot) -> Self {
        Self {
            machine,
            guestpath: guestpath.into(),
            hostpath,
            excludes: Vec::new(),
            auto: true,
            matchers: OnceLock::new(),
        }
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self.matchers = OnceLock::new();
        self
    }

    pub fn with_auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    pub fn machine(&self) -> &Arc<Machine> {
        &self.machine
    }

    pub fn guestpath(&self) -> &str {
        &self.guestpath
    }

    pub fn hostpath(&self) -> &WatchedRoot {
        &self.hostpath
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// Whether the folder is watched after the initial sync.
    pub fn auto(&self) -> bool {
        self.auto
    }

    /// Compiled exclude patterns, built on first use.
    pub fn exclude_matchers(&self) -> &[ExcludePattern] {
        self.matchers
            .get_or_init(|| ExcludePattern::compile_all(&self.excludes))
    }
}
