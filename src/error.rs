//! Error types for Reflect
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Reflect operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Exit code ssh uses when the connection itself failed.
///
/// rsync passes it through when its remote shell dies, so both transports
/// report an unreachable guest the same way.
pub const SSH_CONNECTION_FAILED: i32 = 255;

/// Main error type for Reflect operations
#[derive(Error, Debug)]
pub enum ReflectError {
    /// A spawned transport command exited with a non-zero status
    #[error(
        "command failed with exit code {exit_code}: {command}\n\
         guest path: {guestpath}\n\
         host path: {hostpath}\n\
         {stderr}"
    )]
    Transport {
        command: String,
        guestpath: String,
        hostpath: String,
        exit_code: i32,
        stderr: String,
    },

    /// The guest could not be reached (rebooting, halting, network down)
    #[error("machine '{machine}' is not ready for guest communication")]
    GuestNotReady { machine: String, command: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// A watcher could not be created or started
    #[error("failed to watch {root}: {message}")]
    Watch { root: PathBuf, message: String },

    /// The interrupt handler could not be installed
    #[error("failed to install interrupt handler: {0}")]
    Signal(String),

    /// Nothing was configured for automatic sync
    #[error("no folders are configured for automatic sync")]
    NoFoldersToWatch,
}

impl ReflectError {
    /// Whether this error means the guest is mid-transition rather than broken
    pub fn is_guest_not_ready(&self) -> bool {
        matches!(self, Self::GuestNotReady { .. })
    }
}
