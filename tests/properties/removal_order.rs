//! Property tests for remote directory removal ordering.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use reflect::domain::ports::HostFs;
use reflect::domain::services::RemovalPlanner;
use reflect::domain::value_objects::WatchedRoot;

/// Host where only the listed directories still exist
struct Host(HashSet<PathBuf>);

impl HostFs for Host {
    fn exists(&self, path: &Path) -> bool {
        self.0.contains(path)
    }
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")].prop_map(str::to_string)
}

fn rel_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..6).prop_map(|parts| format!("{}.txt", parts.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: no directory is listed twice and every directory comes
    /// before all of its ancestors.
    #[test]
    fn property_descendants_precede_ancestors(
        removed in proptest::collection::vec(rel_path(), 1..20),
        surviving in proptest::collection::vec(segment(), 0..3),
    ) {
        let root = WatchedRoot::new("/proj");
        let host = Host(surviving.iter().map(|s| root.join(s)).collect());
        let plan = RemovalPlanner::new(&host).plan(&removed, &root, "/g/");

        let unique: HashSet<&String> = plan.dirs.iter().collect();
        prop_assert_eq!(unique.len(), plan.dirs.len());

        for (i, dir) in plan.dirs.iter().enumerate() {
            for earlier in &plan.dirs[..i] {
                prop_assert!(
                    !dir.starts_with(&format!("{earlier}/")),
                    "{} listed after its ancestor {}",
                    dir,
                    earlier
                );
            }
        }

        for dir in &plan.dirs {
            let rel = dir.trim_start_matches("/g/");
            prop_assert!(!host.exists(&root.join(rel)));
        }
        prop_assert_eq!(plan.files.len(), removed.len());
    }
}

proptest! {
    /// PROPERTY: once every directory still exists on the host, planning the
    /// same batch again schedules no directory removals.
    #[test]
    fn property_replanning_with_surviving_dirs_is_empty(
        removed in proptest::collection::vec(rel_path(), 1..10),
    ) {
        let root = WatchedRoot::new("/proj");
        let mut dirs = HashSet::new();
        for rel in &removed {
            let mut parent = Path::new(rel).parent();
            while let Some(dir) = parent.filter(|d| !d.as_os_str().is_empty()) {
                dirs.insert(root.join(&dir.to_string_lossy()));
                parent = dir.parent();
            }
        }
        let plan = RemovalPlanner::new(&Host(dirs)).plan(&removed, &root, "/g/");
        prop_assert!(plan.dirs.is_empty());
    }
}
