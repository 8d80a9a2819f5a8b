//! Configuration loading and validation

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReflectError, ReflectResult};

use super::env_validator::{parse_flag, suggest};
use super::types::Config;

/// Name of the configuration file looked up from the working directory
pub const CONFIG_FILE_NAME: &str = "reflect.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ReflectResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| ReflectError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ReflectError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    validate(&config).map_err(|message| ReflectError::Config {
        file: path.to_path_buf(),
        message,
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Find `reflect.toml` in `start` or the closest ancestor holding one.
pub fn discover(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Apply environment variable overrides (REFLECT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |var| std::env::var(var).ok())
}

/// Apply REFLECT_* overrides read through `lookup`.
pub fn with_overrides_from(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Config {
    let flag = |var: &str| parse_flag(var, &lookup(var)?);
    if let Some(value) = flag("REFLECT_INCREMENTAL") {
        config.reflect.incremental = value;
    }
    if let Some(value) = flag("REFLECT_POLL") {
        config.reflect.poll = value;
    }
    if let Some(value) = flag("REFLECT_SHOW_SYNC_TIME") {
        config.reflect.show_sync_time = value;
    }
    config
}

fn validate(config: &Config) -> Result<(), String> {
    let mut names = HashSet::new();
    for machine in &config.machines {
        if machine.name.trim().is_empty() {
            return Err("machine name must not be empty".to_string());
        }
        if !names.insert(machine.name.as_str()) {
            return Err(format!("machine '{}' is defined twice", machine.name));
        }
        if machine.host.is_empty() || machine.user.is_empty() {
            return Err(format!("machine '{}' needs a host and a user", machine.name));
        }
        if machine.port == 0 {
            return Err(format!("machine '{}' has port 0", machine.name));
        }
        for folder in &machine.folders {
            if !folder.guestpath.starts_with('/') {
                return Err(format!(
                    "guest path '{}' of machine '{}' must be absolute",
                    folder.guestpath, machine.name
                ));
            }
        }
    }
    Ok(())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "reflect",
        "incremental",
        "poll",
        "show_sync_time",
        "remote_removals",
        "debounce_ms",
        "rsync",
        "args",
        "rsync_path",
        "machine",
        "name",
        "host",
        "port",
        "user",
        "identity_files",
        "proxy_command",
        "id_file",
        "folder",
        "hostpath",
        "guestpath",
        "exclude",
        "auto",
        "disabled",
    ];

    suggest(unknown, CANDIDATES).map(str::to_string)
}
