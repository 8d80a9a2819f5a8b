//! Transport command value object

use std::fmt;
use std::path::{Path, PathBuf};

/// The four commands a sync target can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Mirror the whole root
    FullMirror,
    /// Mirror only the paths written to stdin
    IncrementalMirror,
    /// Remove the remote files written to stdin
    RemoteFileRemove,
    /// Remove the remote directories written to stdin, in order
    RemoteDirRemove,
}

/// How the child's standard input is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    /// No input; stdin is `/dev/null`
    Null,
    /// Input is fed line by line on writability notifications
    Notify,
}

/// A spawnable external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportCommand {
    kind: CommandKind,
    program: String,
    args: Vec<String>,
    workdir: Option<PathBuf>,
    stdin: StdinMode,
}

impl TransportCommand {
    pub fn new(kind: CommandKind, program: impl Into<String>, args: Vec<String>) -> Self {
        let stdin = match kind {
            CommandKind::FullMirror => StdinMode::Null,
            _ => StdinMode::Notify,
        };
        Self {
            kind,
            program: program.into(),
            args,
            workdir: None,
            stdin,
        }
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn stdin_mode(&self) -> StdinMode {
        self.stdin
    }

    /// Space-joined argv, for diagnostics.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}
