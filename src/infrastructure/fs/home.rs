//! Home directory resolution with test isolation support.
//!
//! `REFLECT_TEST_HOME` overrides `dirs::home_dir()` so tests can expand `~`
//! without touching the real home directory.

use std::path::{Path, PathBuf};

/// Environment variable for test isolation of home directory.
pub const REFLECT_TEST_HOME_VAR: &str = "REFLECT_TEST_HOME";

/// The home directory used to expand `~` in configured paths.
pub fn reflect_home_dir() -> Option<PathBuf> {
    std::env::var(REFLECT_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Expand a leading `~` or `~/`.
///
/// Paths naming another user's home (`~bob/`) are returned unchanged, as is
/// everything when no home directory can be found.
pub fn expand_home(path: &Path) -> PathBuf {
    expand_home_with(path, reflect_home_dir().as_deref())
}

/// Expand a leading `~` against an explicit home directory.
pub fn expand_home_with(path: &Path, home: Option<&Path>) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match home {
        Some(home) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
