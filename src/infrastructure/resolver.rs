//! Config-backed target resolution
//!
//! Expands the configured folders into [`SyncTarget`]s once at startup and
//! re-reads each machine's identity file whenever the engine asks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::domain::entities::{Machine, SshInfo, SyncTarget};
use crate::domain::ports::TargetResolver;
use crate::domain::value_objects::WatchedRoot;
use crate::error::{ReflectError, ReflectResult};
use crate::infrastructure::fs::expand_home;

/// Resolves targets from a loaded [`Config`]
#[derive(Debug, Clone)]
pub struct ConfigTargetResolver {
    targets: Vec<SyncTarget>,
}

impl ConfigTargetResolver {
    /// Build every target of the selected machines (all when `selected` is
    /// empty). Relative paths are taken from the config file's directory.
    pub fn from_config(
        config: &Config,
        config_path: &Path,
        selected: &[String],
    ) -> ReflectResult<Self> {
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let config_error = |message: String| ReflectError::Config {
            file: config_path.to_path_buf(),
            message,
        };

        if let Some(unknown) = selected.iter().find(|name| config.machine(name).is_none()) {
            let known: Vec<_> = config.machines.iter().map(|m| m.name.as_str()).collect();
            return Err(config_error(format!(
                "unknown machine '{unknown}' (configured: {})",
                known.join(", ")
            )));
        }

        let mut targets = Vec::new();
        for machine_config in &config.machines {
            if !selected.is_empty() && !selected.contains(&machine_config.name) {
                continue;
            }

            let ssh = SshInfo {
                host: machine_config.host.clone(),
                port: machine_config.port,
                user: machine_config.user.clone(),
                identity_files: machine_config
                    .identity_files
                    .iter()
                    .map(|path| resolve_path(base, path))
                    .collect(),
                proxy_command: machine_config.proxy_command.clone(),
            };
            let mut machine = Machine::new(&machine_config.name, ssh);
            if let Some(id_file) = &machine_config.id_file {
                machine = machine.with_id_file(resolve_path(base, id_file));
            }
            let machine = Arc::new(machine);

            for folder in machine_config.folders.iter().filter(|f| !f.disabled) {
                let hostpath = resolve_hostpath(base, &folder.hostpath).map_err(|e| {
                    config_error(format!(
                        "host path '{}' of machine '{}': {e}",
                        folder.hostpath.display(),
                        machine_config.name
                    ))
                })?;
                debug!(
                    machine = %machine_config.name,
                    hostpath = %hostpath.display(),
                    guestpath = %folder.guestpath,
                    "folder resolved"
                );
                targets.push(
                    SyncTarget::new(
                        Arc::clone(&machine),
                        folder.guestpath.clone(),
                        WatchedRoot::new(hostpath),
                    )
                    .with_excludes(folder.exclude.clone())
                    .with_auto(folder.auto),
                );
            }
        }

        Ok(Self { targets })
    }
}

impl TargetResolver for ConfigTargetResolver {
    fn sync_targets(&self) -> Vec<SyncTarget> {
        self.targets.clone()
    }

    fn machine_identity(&self, machine: &Machine) -> Option<String> {
        let Some(id_file) = machine.id_file() else {
            return Some(machine.name().to_string());
        };
        match fs::read_to_string(id_file) {
            Ok(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                debug!(machine = machine.name(), error = %e, "no identity");
                None
            }
        }
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

fn resolve_hostpath(base: &Path, path: &Path) -> io::Result<PathBuf> {
    let resolved = resolve_path(base, path).canonicalize()?;
    if !resolved.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "not a directory"));
    }
    Ok(resolved)
}
