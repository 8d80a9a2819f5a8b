//! Shared fixtures for the integration tests.
//!
//! - `ShellTransport`: a transport whose commands are plain `sh` scripts that
//!   log what they received, so the real process runner can be exercised
//!   without rsync or ssh
//! - `RecordingSink`: collects every sync event
//! - builders for machines and targets

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reflect::domain::entities::{Machine, SshInfo, SyncTarget};
use reflect::domain::ports::{SyncEvent, SyncEventSink, TargetResolver, Transport};
use reflect::domain::value_objects::{CommandKind, TransportCommand, WatchedRoot};

/// Transport that appends stdin (or a marker line) to one log per command kind.
pub struct ShellTransport {
    logs: PathBuf,
    pub pure_delete: bool,
}

impl ShellTransport {
    pub fn new(logs: impl Into<PathBuf>) -> Self {
        Self {
            logs: logs.into(),
            pure_delete: false,
        }
    }

    pub fn with_pure_delete(mut self) -> Self {
        self.pure_delete = true;
        self
    }

    pub fn log_path(&self, kind: CommandKind) -> PathBuf {
        self.logs.join(log_name(kind))
    }

    fn script(&self, kind: CommandKind, target: &SyncTarget) -> TransportCommand {
        let log = self.log_path(kind);
        let script = match kind {
            CommandKind::FullMirror => format!(
                "echo '{} {}' >> '{}'",
                target.machine().name(),
                target.guestpath(),
                log.display()
            ),
            _ => format!("cat >> '{}'", log.display()),
        };
        TransportCommand::new(kind, "sh", vec!["-c".to_string(), script])
    }
}

impl Transport for ShellTransport {
    fn full_mirror(&self, target: &SyncTarget) -> TransportCommand {
        self.script(CommandKind::FullMirror, target)
    }

    fn incremental_mirror(&self, target: &SyncTarget) -> TransportCommand {
        self.script(CommandKind::IncrementalMirror, target)
    }

    fn remote_file_remove(&self, target: &SyncTarget) -> TransportCommand {
        self.script(CommandKind::RemoteFileRemove, target)
    }

    fn remote_dir_remove(&self, target: &SyncTarget) -> TransportCommand {
        self.script(CommandKind::RemoteDirRemove, target)
    }

    fn supports_pure_delete(&self) -> bool {
        self.pure_delete
    }
}

fn log_name(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::FullMirror => "full.log",
        CommandKind::IncrementalMirror => "incremental.log",
        CommandKind::RemoteFileRemove => "rm.log",
        CommandKind::RemoteDirRemove => "rmdir.log",
    }
}

/// Read a log, treating a missing file as empty.
pub fn read_log(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// Resolver where every machine is up.
pub struct UpResolver;

impl TargetResolver for UpResolver {
    fn sync_targets(&self) -> Vec<SyncTarget> {
        Vec::new()
    }

    fn machine_identity(&self, machine: &Machine) -> Option<String> {
        Some(machine.name().to_string())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&SyncEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(*e)).count()
    }
}

impl SyncEventSink for RecordingSink {
    fn on_event(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn machine(name: &str) -> Arc<Machine> {
    Arc::new(Machine::new(
        name,
        SshInfo {
            host: "127.0.0.1".to_string(),
            port: 2222,
            user: "vagrant".to_string(),
            identity_files: Vec::new(),
            proxy_command: None,
        },
    ))
}

pub fn target(machine_name: &str, root: &Path, guestpath: &str) -> SyncTarget {
    SyncTarget::new(machine(machine_name), guestpath, WatchedRoot::new(root))
}

/// A temp directory resolved through symlinks, as the watcher reports it.
pub fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().canonicalize().unwrap();
    (dir, path)
}

/// Poll `check` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    check()
}
