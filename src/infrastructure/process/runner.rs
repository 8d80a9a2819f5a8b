//! System command runner
//!
//! Spawns transport commands with `std::process` and multiplexes the child's
//! standard streams with `poll(2)`.

use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd};
use std::os::unix::process::ExitStatusExt;
use std::process::{ChildStderr, ChildStdin, ChildStdout, Command, Stdio};

use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::{debug, trace};

use crate::domain::ports::{CommandRunner, ExitResult, ProcessEvent, StdinChannel};
use crate::domain::value_objects::{StdinMode, TransportCommand};

const READ_CHUNK: usize = 8192;

/// Runs commands as local child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Non-blocking write end of a child's stdin.
///
/// Closing drops the pipe, which the child sees as end of input.
pub struct ChildStdinChannel {
    pipe: Option<ChildStdin>,
}

impl ChildStdinChannel {
    fn new(pipe: ChildStdin) -> io::Result<Self> {
        set_nonblocking(&pipe)?;
        Ok(Self { pipe: Some(pipe) })
    }
}

impl StdinChannel for ChildStdinChannel {
    fn write_nonblock(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.pipe.as_mut() {
            Some(pipe) => pipe.write(buf),
            None => Err(io::ErrorKind::BrokenPipe.into()),
        }
    }

    fn close(&mut self) {
        self.pipe = None;
    }

    fn is_closed(&self) -> bool {
        self.pipe.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

fn set_nonblocking(fd: &impl AsRawFd) -> io::Result<()> {
    let raw = fd.as_raw_fd();
    let flags = OFlag::from_bits_truncate(fcntl(raw, FcntlArg::F_GETFL)?);
    fcntl(raw, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    Ok(())
}

/// Read what is available; `None` once the stream is finished.
fn drain<R: Read>(reader: &mut R, buf: &mut [u8]) -> Option<usize> {
    match reader.read(buf) {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
            Some(0)
        }
        Err(e) => {
            debug!(error = %e, "read from child failed");
            None
        }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        command: &TransportCommand,
        on_event: &mut dyn FnMut(ProcessEvent<'_>),
    ) -> io::Result<ExitResult> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = command.workdir() {
            cmd.current_dir(dir);
        }
        cmd.stdin(match command.stdin_mode() {
            StdinMode::Null => Stdio::null(),
            StdinMode::Notify => Stdio::piped(),
        });

        debug!(command = %command, "spawning");
        let mut child = cmd.spawn()?;

        let mut stdin = child.stdin.take().map(ChildStdinChannel::new).transpose()?;
        let mut stdout: Option<ChildStdout> = child.stdout.take();
        let mut stderr: Option<ChildStderr> = child.stderr.take();
        if let Some(out) = &stdout {
            set_nonblocking(out)?;
        }
        if let Some(err) = &stderr {
            set_nonblocking(err)?;
        }

        let mut captured = Vec::new();
        let mut buf = [0u8; READ_CHUNK];

        loop {
            let stdin_open = stdin.as_ref().is_some_and(|s| !s.is_closed());
            if !stdin_open && stdout.is_none() && stderr.is_none() {
                break;
            }

            let mut ready: Vec<(Stream, PollFlags)> = Vec::with_capacity(3);
            {
                let mut streams = Vec::with_capacity(3);
                let mut fds = Vec::with_capacity(3);
                if let Some(pipe) = stdin.as_ref().and_then(|s| s.pipe.as_ref()) {
                    streams.push(Stream::Stdin);
                    fds.push(PollFd::new(pipe.as_fd(), PollFlags::POLLOUT));
                }
                if let Some(out) = &stdout {
                    streams.push(Stream::Stdout);
                    fds.push(PollFd::new(out.as_fd(), PollFlags::POLLIN));
                }
                if let Some(err) = &stderr {
                    streams.push(Stream::Stderr);
                    fds.push(PollFd::new(err.as_fd(), PollFlags::POLLIN));
                }

                match poll(&mut fds, PollTimeout::NONE) {
                    Ok(_) => {}
                    Err(Errno::EINTR) => continue,
                    Err(e) => return Err(e.into()),
                }

                for (stream, fd) in streams.into_iter().zip(&fds) {
                    if let Some(revents) = fd.revents().filter(|r| !r.is_empty()) {
                        ready.push((stream, revents));
                    }
                }
            }

            for (stream, revents) in ready {
                trace!(?stream, ?revents, "stream ready");
                match stream {
                    Stream::Stdin => {
                        if let Some(channel) = stdin.as_mut() {
                            on_event(ProcessEvent::StdinReady(&mut *channel));
                            // The child is gone; nothing more can be written
                            if revents.intersects(PollFlags::POLLERR | PollFlags::POLLHUP) {
                                channel.close();
                            }
                        }
                    }
                    Stream::Stdout => {
                        if let Some(out) = stdout.as_mut() {
                            match drain(out, &mut buf) {
                                Some(0) => {}
                                Some(n) => on_event(ProcessEvent::Stdout(&buf[..n])),
                                None => stdout = None,
                            }
                        }
                    }
                    Stream::Stderr => {
                        if let Some(err) = stderr.as_mut() {
                            match drain(err, &mut buf) {
                                Some(0) => {}
                                Some(n) => {
                                    captured.extend_from_slice(&buf[..n]);
                                    on_event(ProcessEvent::Stderr(&buf[..n]));
                                }
                                None => stderr = None,
                            }
                        }
                    }
                }
            }
        }

        // Whatever the handler left open is closed before waiting
        drop(stdin);
        let status = child.wait()?;
        let exit_code = status
            .code()
            .or_else(|| status.signal().map(|signal| 128 + signal))
            .unwrap_or(-1);

        debug!(command = %command, exit_code, "command finished");
        Ok(ExitResult {
            exit_code,
            stderr: String::from_utf8_lossy(&captured).into_owned(),
        })
    }
}
