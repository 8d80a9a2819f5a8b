//! File System Implementations

mod home;
mod local;

pub use home::{expand_home, expand_home_with, reflect_home_dir, REFLECT_TEST_HOME_VAR};
pub use local::LocalHostFs;
