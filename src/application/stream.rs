//! Streaming transport writer
//!
//! Feeds a queue of paths, one per line, into a running command's standard
//! input without ever blocking on the write side.

use std::collections::VecDeque;
use std::io;

use tracing::{debug, trace};

use crate::domain::ports::{CommandRunner, ExitResult, ProcessEvent, StdinChannel};
use crate::domain::value_objects::TransportCommand;

/// A line that has only been partly written.
#[derive(Debug)]
struct PendingLine {
    bytes: Vec<u8>,
    written: usize,
}

impl PendingLine {
    fn new(item: &str) -> Self {
        let mut bytes = Vec::with_capacity(item.len() + 1);
        bytes.extend_from_slice(item.as_bytes());
        bytes.push(b'\n');
        Self { bytes, written: 0 }
    }

    fn remaining(&self) -> &[u8] {
        &self.bytes[self.written..]
    }

    fn advance(&mut self, n: usize) {
        self.written = (self.written + n).min(self.bytes.len());
    }

    fn is_done(&self) -> bool {
        self.written == self.bytes.len()
    }
}

/// Write-side state machine for one streamed command.
///
/// Items are consumed from the front of the queue as they are first
/// attempted; a short write keeps the unwritten tail for the next
/// notification. Once the queue is drained the channel is closed exactly once.
pub struct LineFeeder<F> {
    items: VecDeque<String>,
    current: Option<PendingLine>,
    on_item: F,
    finished: bool,
    failure: Option<io::Error>,
}

impl<F: FnMut(&str)> LineFeeder<F> {
    pub fn new(items: impl IntoIterator<Item = String>, on_item: F) -> Self {
        Self {
            items: items.into_iter().collect(),
            current: None,
            on_item,
            finished: false,
            failure: None,
        }
    }

    /// Handle one writability notification.
    pub fn on_writable(&mut self, channel: &mut dyn StdinChannel) {
        if self.finished {
            return;
        }

        loop {
            if self.current.is_none() {
                match self.items.pop_front() {
                    Some(item) => {
                        (self.on_item)(&item);
                        self.current = Some(PendingLine::new(&item));
                    }
                    None => {
                        channel.close();
                        self.finished = true;
                        return;
                    }
                }
            }

            let Some(line) = self.current.as_mut() else {
                return;
            };

            match channel.write_nonblock(line.remaining()) {
                // Nothing accepted; wait for the next notification
                Ok(0) => return,
                Ok(n) => {
                    line.advance(n);
                    if !line.is_done() {
                        trace!(written = n, left = line.remaining().len(), "short write");
                        return;
                    }
                    self.current = None;
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    return;
                }
                Err(e) => {
                    debug!(error = %e, "stdin write failed, closing input");
                    channel.close();
                    self.finished = true;
                    self.failure = Some(e);
                    return;
                }
            }
        }
    }

    /// Whether the input channel has been closed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Items not yet pulled from the queue.
    pub fn remaining_items(&self) -> usize {
        self.items.len()
    }

    /// A write error other than would-block/interrupted, if one occurred.
    pub fn take_failure(&mut self) -> Option<io::Error> {
        self.failure.take()
    }
}

/// Run `command`, writing every item as a line to its standard input.
///
/// `on_item` is called once per item, when it is first attempted. Blocks until
/// the command exits. A write failure is only reported when the command
/// itself claims success; otherwise its exit status tells the real story.
pub fn stream_items<F>(
    runner: &dyn CommandRunner,
    command: &TransportCommand,
    items: Vec<String>,
    on_item: F,
) -> io::Result<ExitResult>
where
    F: FnMut(&str),
{
    debug!(command = %command, items = items.len(), "streaming items");

    let mut feeder = LineFeeder::new(items, on_item);
    let result = runner.run(command, &mut |event| match event {
        ProcessEvent::StdinReady(channel) => feeder.on_writable(channel),
        ProcessEvent::Stdout(bytes) => {
            for line in String::from_utf8_lossy(bytes).lines() {
                debug!(target: "reflect::transport", "{line}");
            }
        }
        ProcessEvent::Stderr(_) => {}
    })?;

    if let Some(failure) = feeder.take_failure() {
        if result.success() {
            return Err(failure);
        }
    }

    Ok(result)
}
