//! Interrupt handling
//!
//! `ctrlc` runs the handler on its own thread, outside the signal context.
//! The handler only drops a token into a one-slot channel; repeated
//! interrupts while a token is pending are coalesced.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use crate::error::{ReflectError, ReflectResult};

/// Install the Ctrl+C handler and return the channel it signals.
///
/// Can only be called once per process.
pub fn interrupt_channel() -> ReflectResult<Receiver<()>> {
    let (tx, rx) = sync_channel(1);
    ctrlc::set_handler(move || notify(&tx)).map_err(|e| ReflectError::Signal(e.to_string()))?;
    Ok(rx)
}

fn notify(tx: &SyncSender<()>) {
    // Full means a shutdown is already pending; disconnected means nobody waits
    let _ = tx.try_send(());
}
