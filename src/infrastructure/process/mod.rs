//! Process execution
//!
//! - `SystemCommandRunner` - spawns local child processes

mod runner;

pub use runner::{ChildStdinChannel, SystemCommandRunner};
