//! Rsync Transport
//!
//! Mirrors folders with rsync over ssh and removes guest paths with plain
//! ssh commands fed from stdin.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::domain::entities::{SshInfo, SyncTarget};
use crate::domain::ports::Transport;
use crate::domain::value_objects::{CommandKind, TransportCommand};

/// rsync flags used when none are configured
pub const DEFAULT_RSYNC_ARGS: &[&str] = &["--verbose", "--archive", "--delete", "-z", "--links"];

/// Remote command removing the newline-separated paths on stdin.
///
/// A removed path may have been a whole directory moved out of the root, so
/// entries are removed recursively.
const REMOTE_RM: &str = r"tr '\n' '\0' | xargs -0 rm -rf";

/// Remote command removing the newline-separated directories on stdin, one at
/// a time. Directories that still hold files are left alone.
const REMOTE_RMDIR: &str = r"tr '\n' '\0' | xargs -0 -n 1 rmdir 2>/dev/null || true";

/// Transport built on the `rsync` and `ssh` binaries
#[derive(Debug, Clone)]
pub struct RsyncTransport {
    args: Vec<String>,
    rsync_path: Option<String>,
    workdir: PathBuf,
    remote_removals: bool,
}

impl RsyncTransport {
    /// Create a transport running every command from `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            args: DEFAULT_RSYNC_ARGS.iter().map(|s| s.to_string()).collect(),
            rsync_path: None,
            workdir: workdir.into(),
            remote_removals: false,
        }
    }

    /// Replace the base rsync flags.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Command used to run rsync on the guest (e.g. `sudo rsync`).
    pub fn with_rsync_path(mut self, rsync_path: Option<String>) -> Self {
        self.rsync_path = rsync_path;
        self
    }

    /// Send removals through `rm`/`rmdir` instead of a full mirror.
    pub fn with_remote_removals(mut self, enabled: bool) -> Self {
        self.remote_removals = enabled;
        self
    }

    /// Check if rsync is installed and available
    pub fn check_available() -> bool {
        Command::new("rsync")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Flags shared by the full and incremental mirror.
    fn base_args(&self, target: &SyncTarget) -> Vec<String> {
        let mut args = self.args.clone();

        // --archive implies owner/group preservation, which only makes sense
        // when asked for explicitly
        if !has_any(&args, &["--owner", "-o"]) {
            args.push("--no-owner".to_string());
        }
        if !has_any(&args, &["--group", "-g"]) {
            args.push("--no-group".to_string());
        }

        if let Some(rsync_path) = &self.rsync_path {
            args.push("--rsync-path".to_string());
            args.push(rsync_path.clone());
        }

        args.push("-e".to_string());
        args.push(rsh_command(target.machine().ssh()));

        for exclude in target.excludes() {
            args.push("--exclude".to_string());
            args.push(exclude.clone());
        }

        args
    }

    fn destination(target: &SyncTarget) -> String {
        format!("{}:{}", target.machine().ssh().remote(), target.guestpath())
    }

    fn remote_command(
        &self,
        kind: CommandKind,
        target: &SyncTarget,
        script: &str,
    ) -> TransportCommand {
        let ssh = target.machine().ssh();
        let mut args = ssh_options(ssh);
        args.push(ssh.remote());
        args.push(script.to_string());
        TransportCommand::new(kind, "ssh", args).with_workdir(&self.workdir)
    }
}

impl Transport for RsyncTransport {
    fn full_mirror(&self, target: &SyncTarget) -> TransportCommand {
        let mut args = self.base_args(target);
        args.push(target.hostpath().to_string());
        args.push(Self::destination(target));
        TransportCommand::new(CommandKind::FullMirror, "rsync", args).with_workdir(&self.workdir)
    }

    fn incremental_mirror(&self, target: &SyncTarget) -> TransportCommand {
        let mut args = self.base_args(target);
        args.push("--files-from=-".to_string());
        args.push(target.hostpath().to_string());
        args.push(Self::destination(target));
        TransportCommand::new(CommandKind::IncrementalMirror, "rsync", args)
            .with_workdir(&self.workdir)
    }

    fn remote_file_remove(&self, target: &SyncTarget) -> TransportCommand {
        self.remote_command(CommandKind::RemoteFileRemove, target, REMOTE_RM)
    }

    fn remote_dir_remove(&self, target: &SyncTarget) -> TransportCommand {
        self.remote_command(CommandKind::RemoteDirRemove, target, REMOTE_RMDIR)
    }

    fn supports_pure_delete(&self) -> bool {
        self.remote_removals
    }
}

fn has_any(args: &[String], flags: &[&str]) -> bool {
    args.iter().any(|arg| flags.contains(&arg.as_str()))
}

/// ssh options (without the program name) for a machine.
fn ssh_options(ssh: &SshInfo) -> Vec<String> {
    let mut args = vec!["-p".to_string(), ssh.port.to_string()];
    if let Some(proxy) = &ssh.proxy_command {
        args.push("-o".to_string());
        args.push(format!("ProxyCommand={proxy}"));
    }
    for option in [
        "StrictHostKeyChecking=no",
        "IdentitiesOnly=true",
        "UserKnownHostsFile=/dev/null",
    ] {
        args.push("-o".to_string());
        args.push(option.to_string());
    }
    for identity in &ssh.identity_files {
        args.push("-i".to_string());
        args.push(identity.to_string_lossy().into_owned());
    }
    args
}

/// The ssh invocation handed to rsync's `-e`, as one string.
fn rsh_command(ssh: &SshInfo) -> String {
    std::iter::once("ssh".to_string())
        .chain(ssh_options(ssh).iter().map(|arg| quote(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote one word for rsync's `-e` splitting.
fn quote(word: &str) -> String {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        return word.to_string();
    }
    if !word.contains('\'') {
        return format!("'{word}'");
    }
    let escaped = word.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
