//! Event Sink Implementations
//!
//! - ConsoleEventSink: timestamped status lines
//! - JsonEventSink: NDJSON output for scripts

mod console;
mod json;

pub use console::{render_event, ConsoleEventSink};
pub use json::JsonEventSink;
