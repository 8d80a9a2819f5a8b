//! Console Event Sink
//!
//! Renders sync events as timestamped status lines.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::{Color, Stylize};
use is_terminal::IsTerminal;

use crate::domain::ports::{SyncEvent, SyncEventSink};

const INFO: Color = Color::Cyan;
const SUCCESS: Color = Color::Green;
const WARNING: Color = Color::Yellow;
const ERROR: Color = Color::Red;
const DIM: Color = Color::DarkGrey;

/// Event sink printing human-readable lines
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleEventSink {
    /// Write to stdout, colored when it is a terminal and `NO_COLOR` is unset.
    pub fn stdout() -> Self {
        let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::with_writer(io::stdout(), color)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, color: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color,
        }
    }
}

impl SyncEventSink for ConsoleEventSink {
    fn on_event(&self, event: SyncEvent) {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let line = render_event(&timestamp, &event, self.color);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

/// Render one event without a trailing newline.
pub fn render_event(timestamp: &str, event: &SyncEvent, color: bool) -> String {
    let prefix = paint(&format!("[{timestamp}]"), DIM, color);
    let body = match event {
        SyncEvent::FolderConfigured {
            machine,
            guestpath,
            hostpath,
        } => format!("{machine}: {guestpath} <= {hostpath}"),
        SyncEvent::ExcludesConfigured { machine, excludes } => {
            format!("{machine}:   Excluding: {}", excludes.join(", "))
        }
        SyncEvent::InitialSync { machine } => {
            format!("{machine}: Doing an initial sync...")
        }
        SyncEvent::Watching { machine, path } => {
            format!("{machine}: {} {path}", paint("Watching:", INFO, color))
        }
        SyncEvent::NothingToWatch => {
            "No folders are configured for automatic sync. Exiting.".to_string()
        }
        SyncEvent::Changed { machine, path } => {
            format!("{machine}: {} {path}", paint("Changed:", INFO, color))
        }
        SyncEvent::Removed { machine, path } => {
            format!("{machine}: {} {path}", paint("Removed:", WARNING, color))
        }
        SyncEvent::Incremental { machine, path } => {
            format!("{machine}: {} {path}", paint("Incremental:", INFO, color))
        }
        SyncEvent::RemoteRemove { machine, path } => {
            format!("{machine}: {} {path}", paint("Remote remove:", WARNING, color))
        }
        SyncEvent::Synced {
            machine,
            elapsed_ms: None,
        } => format!("{machine}: {}", paint("Synced.", SUCCESS, color)),
        SyncEvent::Synced {
            machine,
            elapsed_ms: Some(ms),
        } => {
            let label = format!("Synced in {:.2}s.", *ms as f64 / 1000.0);
            format!("{machine}: {}", paint(&label, SUCCESS, color))
        }
        SyncEvent::Warning { machine, message } => {
            format!("{machine}: {} {message}", paint("Warning:", WARNING, color))
        }
        SyncEvent::Error { machine, message } => {
            format!("{machine}: {} {message}", paint("Error:", ERROR, color))
        }
        SyncEvent::Shutdown => "Interrupt received, stopping watchers.".to_string(),
    };
    format!("{prefix} {body}")
}
