//! Sync Event Port
//!
//! One-way channel for every user-visible line the engine produces.
//! Sinks may be called concurrently from several roots' watcher threads.

use serde::Serialize;

/// Event emitted while configuring, watching and syncing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A folder mapping was configured
    FolderConfigured {
        machine: String,
        guestpath: String,
        hostpath: String,
    },

    /// A folder mapping excludes some paths
    ExcludesConfigured {
        machine: String,
        excludes: Vec<String>,
    },

    /// Initial full sync is starting for a machine
    InitialSync { machine: String },

    /// A root is being watched for a machine
    Watching { machine: String, path: String },

    /// Nothing is configured for automatic sync
    NothingToWatch,

    /// A path changed and will be covered by a full sync
    Changed { machine: String, path: String },

    /// A path was removed and will be covered by a full sync
    Removed { machine: String, path: String },

    /// A path is being sent incrementally
    Incremental { machine: String, path: String },

    /// A remote file is being removed incrementally
    RemoteRemove { machine: String, path: String },

    /// All changes of a batch reached the machine
    Synced {
        machine: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        elapsed_ms: Option<u64>,
    },

    /// The guest could not be reached; the batch was dropped
    Warning { machine: String, message: String },

    /// A transport command failed
    Error { machine: String, message: String },

    /// Interrupt received, watchers are stopping
    Shutdown,
}

/// Trait for receiving sync events
pub trait SyncEventSink: Send + Sync {
    fn on_event(&self, event: SyncEvent);

    /// Whether per-path events are wanted
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl SyncEventSink for NoopEventSink {
    fn on_event(&self, _event: SyncEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
