//! Command Runner Port
//!
//! Spawns an external transport command and reports what happens to its
//! standard streams as tagged events.

use std::io;

use crate::domain::value_objects::TransportCommand;

/// Outcome of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitResult {
    pub exit_code: i32,
    pub stderr: String,
}

impl ExitResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Non-blocking writable end of a child's standard input.
pub trait StdinChannel {
    /// Write as much of `buf` as the channel accepts right now.
    ///
    /// Returns `WouldBlock` (or `Interrupted`) when nothing can be written yet.
    fn write_nonblock(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Close the channel, signalling end of input.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Something happened on one of the child's standard streams.
pub enum ProcessEvent<'a> {
    /// Standard input can accept more data
    StdinReady(&'a mut dyn StdinChannel),
    /// Bytes read from standard output
    Stdout(&'a [u8]),
    /// Bytes read from standard error
    Stderr(&'a [u8]),
}

/// Runs external commands to completion.
pub trait CommandRunner: Send + Sync {
    /// Spawn `command` and block until it exits.
    ///
    /// When the command reads stdin in notify mode, `on_event` receives a
    /// `StdinReady` event every time the channel is writable until the
    /// handler closes it. Standard error is also captured into the result.
    fn run(
        &self,
        command: &TransportCommand,
        on_event: &mut dyn FnMut(ProcessEvent<'_>),
    ) -> io::Result<ExitResult>;
}
