//! Configuration module for Reflect
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (REFLECT_*)
//! 3. Project config (`reflect.toml`)
//! 4. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use loader::{discover, ConfigWarning, CONFIG_FILE_NAME};
pub use types::{
    Config, FolderConfig, MachineConfig, ReflectConfig, RsyncConfig, DEFAULT_DEBOUNCE_MS,
};
