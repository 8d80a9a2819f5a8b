//! Test doubles shared by the use case tests

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::entities::{Machine, SshInfo, SyncTarget};
use crate::domain::ports::{
    CommandRunner, ExitResult, HostFs, ProcessEvent, StdinChannel, SyncEvent, SyncEventSink,
    TargetResolver, Transport,
};
use crate::domain::value_objects::{CommandKind, StdinMode, TransportCommand, WatchedRoot};

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub(crate) kind: CommandKind,
    pub(crate) guestpath: String,
    pub(crate) stdin: String,
}

/// Runner that records every command and its stdin, and exits with a
/// preconfigured status per (kind, guest path).
#[derive(Default)]
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<Call>>,
    exits: Mutex<HashMap<(CommandKind, String), ExitResult>>,
}

impl RecordingRunner {
    pub(crate) fn fail(&self, kind: CommandKind, guestpath: &str, exit_code: i32, stderr: &str) {
        self.exits.lock().unwrap().insert(
            (kind, guestpath.to_string()),
            ExitResult {
                exit_code,
                stderr: stderr.to_string(),
            },
        );
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

struct MemoryChannel {
    bytes: Vec<u8>,
    closed: bool,
}

impl StdinChannel for MemoryChannel {
    fn write_nonblock(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        command: &TransportCommand,
        on_event: &mut dyn FnMut(ProcessEvent<'_>),
    ) -> io::Result<ExitResult> {
        let mut channel = MemoryChannel {
            bytes: Vec::new(),
            closed: false,
        };
        if command.stdin_mode() == StdinMode::Notify {
            while !channel.closed {
                on_event(ProcessEvent::StdinReady(&mut channel));
            }
        }
        on_event(ProcessEvent::Stdout(b"sending incremental file list\n"));

        let guestpath = command.args()[0].clone();
        self.calls.lock().unwrap().push(Call {
            kind: command.kind(),
            guestpath: guestpath.clone(),
            stdin: String::from_utf8(channel.bytes).unwrap(),
        });

        Ok(self
            .exits
            .lock()
            .unwrap()
            .get(&(command.kind(), guestpath))
            .cloned()
            .unwrap_or(ExitResult {
                exit_code: 0,
                stderr: String::new(),
            }))
    }
}

/// Transport whose commands carry only the guest path
pub(crate) struct FakeTransport {
    pub(crate) pure_delete: bool,
}

impl FakeTransport {
    fn command(kind: CommandKind, target: &SyncTarget) -> TransportCommand {
        TransportCommand::new(kind, "fake", vec![target.guestpath().to_string()])
    }
}

impl Transport for FakeTransport {
    fn full_mirror(&self, target: &SyncTarget) -> TransportCommand {
        Self::command(CommandKind::FullMirror, target)
    }

    fn incremental_mirror(&self, target: &SyncTarget) -> TransportCommand {
        Self::command(CommandKind::IncrementalMirror, target)
    }

    fn remote_file_remove(&self, target: &SyncTarget) -> TransportCommand {
        Self::command(CommandKind::RemoteFileRemove, target)
    }

    fn remote_dir_remove(&self, target: &SyncTarget) -> TransportCommand {
        Self::command(CommandKind::RemoteDirRemove, target)
    }

    fn supports_pure_delete(&self) -> bool {
        self.pure_delete
    }
}

#[derive(Default)]
pub(crate) struct FakeResolver {
    pub(crate) torn_down: HashSet<String>,
}

impl TargetResolver for FakeResolver {
    fn sync_targets(&self) -> Vec<SyncTarget> {
        Vec::new()
    }

    fn machine_identity(&self, machine: &Machine) -> Option<String> {
        (!self.torn_down.contains(machine.name())).then(|| format!("id-{}", machine.name()))
    }
}

#[derive(Default)]
pub(crate) struct FakeHost(pub(crate) HashSet<PathBuf>);

impl HostFs for FakeHost {
    fn exists(&self, path: &Path) -> bool {
        self.0.contains(path)
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SyncEventSink for RecordingSink {
    fn on_event(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub(crate) fn machine(name: &str) -> Arc<Machine> {
    Arc::new(Machine::new(
        name,
        SshInfo {
            host: "127.0.0.1".to_string(),
            port: 2222,
            user: "vagrant".to_string(),
            identity_files: vec![],
            proxy_command: None,
        },
    ))
}

/// Target on `machine` mirroring `hostpath` to `guestpath`
pub(crate) fn target_at(machine_name: &str, hostpath: &str, guestpath: &str) -> SyncTarget {
    SyncTarget::new(machine(machine_name), guestpath, WatchedRoot::new(hostpath))
}
