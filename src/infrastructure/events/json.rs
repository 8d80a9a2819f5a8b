//! JSON Event Sink
//!
//! Outputs sync events as NDJSON for scripts and editors.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{SyncEvent, SyncEventSink};

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Serializes lines from concurrently syncing roots
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl SyncEventSink for JsonEventSink {
    fn on_event(&self, event: SyncEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize event");
                return;
            }
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}
