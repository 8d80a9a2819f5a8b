//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReflectResult;
use crate::infrastructure::transport::DEFAULT_RSYNC_ARGS;

use super::loader::{self, ConfigWarning};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = crate::domain::ports::DEBOUNCE_MS;

/// Engine behaviour (`[reflect]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectConfig {
    #[serde(default = "default_true")]
    pub incremental: bool,

    #[serde(default)]
    pub poll: bool,

    #[serde(default)]
    pub show_sync_time: bool,

    /// Send removals through `rm`/`rmdir` instead of a full mirror
    #[serde(default)]
    pub remote_removals: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ReflectConfig {
    fn default() -> Self {
        Self {
            incremental: true,
            poll: false,
            show_sync_time: false,
            remote_removals: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// rsync invocation (`[rsync]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsyncConfig {
    #[serde(default = "default_rsync_args")]
    pub args: Vec<String>,

    /// Command running rsync on the remote side
    #[serde(default)]
    pub rsync_path: Option<String>,
}

impl Default for RsyncConfig {
    fn default() -> Self {
        Self {
            args: default_rsync_args(),
            rsync_path: None,
        }
    }
}

/// One remote machine (`[[machine]]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub name: String,

    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub user: String,

    #[serde(default)]
    pub identity_files: Vec<PathBuf>,

    #[serde(default)]
    pub proxy_command: Option<String>,

    /// File holding the machine's identity; missing or empty means torn down
    #[serde(default)]
    pub id_file: Option<PathBuf>,

    #[serde(default, rename = "folder")]
    pub folders: Vec<FolderConfig>,
}

/// One folder mapping (`[[machine.folder]]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    pub hostpath: PathBuf,

    pub guestpath: String,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_true")]
    pub auto: bool,

    /// Skip this folder entirely
    #[serde(default)]
    pub disabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    22
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_rsync_args() -> Vec<String> {
    DEFAULT_RSYNC_ARGS.iter().map(|s| s.to_string()).collect()
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub reflect: ReflectConfig,

    #[serde(default)]
    pub rsync: RsyncConfig,

    #[serde(default, rename = "machine")]
    pub machines: Vec<MachineConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ReflectResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ReflectResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (REFLECT_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Look up a machine by name.
    pub fn machine(&self, name: &str) -> Option<&MachineConfig> {
        self.machines.iter().find(|m| m.name == name)
    }
}
