use std::path::PathBuf;

use clap::Parser;

/// Reflect - mirror host folders to remote machines as they change
#[derive(Parser, Debug)]
#[command(name = "reflect")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Press Ctrl+C to stop watching.")]
pub struct Cli {
    /// Machines to sync (all configured machines when omitted)
    pub machines: Vec<String>,

    /// Configuration file (default: nearest reflect.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Poll the filesystem instead of using native notifications
    #[arg(long, overrides_with = "no_poll")]
    pub poll: bool,

    /// Use native filesystem notifications
    #[arg(long, overrides_with = "poll")]
    pub no_poll: bool,

    /// Stream only changed paths to rsync where possible
    #[arg(long, overrides_with = "no_incremental")]
    pub incremental: bool,

    /// Run a full rsync for every change
    #[arg(long, overrides_with = "incremental")]
    pub no_incremental: bool,

    /// Output events as NDJSON
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// `--poll`/`--no-poll`, if either was given
    pub fn poll(&self) -> Option<bool> {
        flag(self.poll, self.no_poll)
    }

    /// `--incremental`/`--no-incremental`, if either was given
    pub fn incremental(&self) -> Option<bool> {
        flag(self.incremental, self.no_incremental)
    }
}

fn flag(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
