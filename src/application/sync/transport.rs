//! Per-target transport steps
//!
//! Runs the mirror and removal commands for one sync target and turns
//! their exit status into errors.

use std::io;

use tracing::debug;

use crate::application::stream::stream_items;
use crate::domain::entities::SyncTarget;
use crate::domain::ports::{CommandRunner, ExitResult, HostFs, ProcessEvent, Transport};
use crate::domain::services::RemovalPlanner;
use crate::domain::value_objects::TransportCommand;
use crate::error::{ReflectError, ReflectResult, SSH_CONNECTION_FAILED};

/// One target's view of the transport.
pub(crate) struct TargetTransport<'a> {
    target: &'a SyncTarget,
    transport: &'a dyn Transport,
    runner: &'a dyn CommandRunner,
}

impl<'a> TargetTransport<'a> {
    pub(crate) fn new(
        target: &'a SyncTarget,
        transport: &'a dyn Transport,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            target,
            transport,
            runner,
        }
    }

    /// Mirror the whole root.
    pub(crate) fn sync_full(&self) -> ReflectResult<()> {
        let command = self.transport.full_mirror(self.target);
        debug!(command = %command, "full mirror");

        let result = self.runner.run(&command, &mut |event| {
            if let ProcessEvent::Stdout(bytes) = event {
                for line in String::from_utf8_lossy(bytes).lines() {
                    debug!(target: "reflect::transport", "{line}");
                }
            }
        });
        self.check_exit(&command, result)
    }

    /// Mirror only the given root-relative paths.
    pub(crate) fn sync_incremental(
        &self,
        items: Vec<String>,
        on_item: impl FnMut(&str),
    ) -> ReflectResult<()> {
        let command = self.transport.incremental_mirror(self.target);
        let result = stream_items(self.runner, &command, items, on_item);
        self.check_exit(&command, result)
    }

    /// Remove the given root-relative paths on the guest, then every guest
    /// directory they leave behind that no longer exists on the host.
    ///
    /// Directories are only removed once their files are gone.
    pub(crate) fn sync_removals(
        &self,
        removed: &[String],
        host_fs: &dyn HostFs,
        on_item: impl FnMut(&str),
    ) -> ReflectResult<()> {
        let plan = RemovalPlanner::new(host_fs).plan(
            removed,
            self.target.hostpath(),
            self.target.guestpath(),
        );

        let command = self.transport.remote_file_remove(self.target);
        let result = stream_items(self.runner, &command, plan.files, on_item);
        self.check_exit(&command, result)?;

        if plan.dirs.is_empty() {
            return Ok(());
        }

        let command = self.transport.remote_dir_remove(self.target);
        let result = stream_items(self.runner, &command, plan.dirs, |dir| {
            debug!(dir, "removing remote directory");
        });
        self.check_exit(&command, result)
    }

    fn check_exit(
        &self,
        command: &TransportCommand,
        result: io::Result<ExitResult>,
    ) -> ReflectResult<()> {
        let result = result?;
        if result.success() {
            return Ok(());
        }

        debug!(
            command = %command,
            exit_code = result.exit_code,
            stderr = %result.stderr.trim_end(),
            "transport command failed"
        );

        if result.exit_code == SSH_CONNECTION_FAILED {
            return Err(ReflectError::GuestNotReady {
                machine: self.target.machine().name().to_string(),
                command: command.command_line(),
            });
        }

        Err(ReflectError::Transport {
            command: command.command_line(),
            guestpath: self.target.guestpath().to_string(),
            hostpath: self.target.hostpath().to_string(),
            exit_code: result.exit_code,
            stderr: result.stderr,
        })
    }
}
