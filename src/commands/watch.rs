use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use reflect::config::{self, Config, ConfigWarning, ReflectConfig};
use reflect::domain::ports::{SyncEventSink, TargetResolver};
use reflect::infrastructure::{
    interrupt_channel, ConfigTargetResolver, ConsoleEventSink, JsonEventSink, LocalHostFs,
    NotifyWatchAdapter, RsyncTransport, SystemCommandRunner,
};
use reflect::{ReflectError, SyncOptions, SyncUseCase, WatchOptions, WatchUseCase};

use crate::cli::Cli;

pub fn cmd_watch(cli: &Cli) -> Result<ExitCode> {
    let config_path = locate_config(cli.config.as_deref())?;
    let (config, warnings) = Config::load_with_warnings(&config_path)?;
    for warning in &warnings {
        eprintln!("{}", render_warning(warning));
    }
    let mut config = config.with_env_overrides();
    apply_cli_overrides(&mut config.reflect, cli);
    info!(config = %config_path.display(), settings = ?config.reflect, "configuration loaded");

    let resolver = ConfigTargetResolver::from_config(&config, &config_path, &cli.machines)?;
    let targets = resolver.sync_targets();

    if !RsyncTransport::check_available() {
        bail!("rsync was not found on PATH; install it on the host to use reflect");
    }

    let workdir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let transport = RsyncTransport::new(workdir)
        .with_args(config.rsync.args.clone())
        .with_rsync_path(config.rsync.rsync_path.clone())
        .with_remote_removals(config.reflect.remote_removals);

    let events: Arc<dyn SyncEventSink> = if cli.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout())
    };

    let sync = SyncUseCase::new(
        Arc::new(SystemCommandRunner::new()),
        Arc::new(transport),
        Arc::new(resolver),
        Arc::new(LocalHostFs::new()),
        events,
    );
    let watch = WatchUseCase::new(Arc::new(NotifyWatchAdapter::new()), Arc::new(sync));
    let options = watch_options(&config.reflect);

    let shutdown = interrupt_channel()?;

    watch.announce(&targets);
    let reports = watch.initial_sync(&targets, &options.sync);
    let failed = reports.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        warn!(failed, "initial sync did not reach every folder");
    }

    match watch.run(&targets, &options, shutdown) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(ReflectError::NoFoldersToWatch) => Ok(ExitCode::from(1)),
        Err(e) => Err(e.into()),
    }
}

/// `--config`, or the nearest `reflect.toml` above the working directory.
fn locate_config(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    config::discover(&cwd).with_context(|| {
        format!(
            "no {} found in {} or any parent directory",
            config::CONFIG_FILE_NAME,
            cwd.display()
        )
    })
}

/// CLI flags win over the environment and the file.
fn apply_cli_overrides(settings: &mut ReflectConfig, cli: &Cli) {
    if let Some(poll) = cli.poll() {
        settings.poll = poll;
    }
    if let Some(incremental) = cli.incremental() {
        settings.incremental = incremental;
    }
}

fn watch_options(settings: &ReflectConfig) -> WatchOptions {
    let sync = SyncOptions::new()
        .with_incremental(settings.incremental)
        .with_show_sync_time(settings.show_sync_time);
    WatchOptions::new(sync)
        .with_force_polling(settings.poll)
        .with_debounce(Duration::from_millis(settings.debounce_ms))
}

fn render_warning(warning: &ConfigWarning) -> String {
    let location = match warning.line {
        Some(line) => format!("{}:{line}", warning.file.display()),
        None => warning.file.display().to_string(),
    };
    let hint = warning
        .suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default();
    format!("Warning: unknown key '{}' in {location}{hint}", warning.key)
}
