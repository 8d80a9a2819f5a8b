//! Machine entity

use std::path::PathBuf;

/// SSH connection parameters for a remote machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshInfo {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub identity_files: Vec<PathBuf>,
    pub proxy_command: Option<String>,
}

impl SshInfo {
    /// `user@host`
    pub fn remote(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// A remote machine folders are mirrored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    name: String,
    ssh: SshInfo,
    id_file: Option<PathBuf>,
}

impl Machine {
    pub fn new(name: impl Into<String>, ssh: SshInfo) -> Self {
        Self {
            name: name.into(),
            ssh,
            id_file: None,
        }
    }

    /// File holding the machine's current identity.
    ///
    /// A missing or empty file means the machine is torn down.
    pub fn with_id_file(mut self, id_file: impl Into<PathBuf>) -> Self {
        self.id_file = Some(id_file.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ssh(&self) -> &SshInfo {
        &self.ssh
    }

    pub fn id_file(&self) -> Option<&std::path::Path> {
        self.id_file.as_deref()
    }
}
