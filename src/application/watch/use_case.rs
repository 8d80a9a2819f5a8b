//! Watch Use Case implementation

use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::sync::{SyncOptions, SyncReport, SyncUseCase};
use crate::domain::entities::SyncTarget;
use crate::domain::ports::{SyncEvent, WatchAdapter, WatchSettings, Watcher, WatcherState};
use crate::domain::value_objects::{ChangeBatch, ExcludePattern, WatchedRoot};
use crate::error::{ReflectError, ReflectResult};

use super::options::WatchOptions;

/// Group the auto-synced targets by the root they watch.
///
/// Roots come out in sorted order; targets keep their configured order.
pub fn group_by_root(targets: &[SyncTarget]) -> BTreeMap<WatchedRoot, Vec<SyncTarget>> {
    let mut roots: BTreeMap<WatchedRoot, Vec<SyncTarget>> = BTreeMap::new();
    for target in targets.iter().filter(|t| t.auto()) {
        roots
            .entry(target.hostpath().clone())
            .or_default()
            .push(target.clone());
    }
    roots
}

/// Watch Use Case
///
/// This is the main entry point for the `reflect` command.
pub struct WatchUseCase {
    adapter: Arc<dyn WatchAdapter>,
    sync: Arc<SyncUseCase>,
}

impl WatchUseCase {
    pub fn new(adapter: Arc<dyn WatchAdapter>, sync: Arc<SyncUseCase>) -> Self {
        Self { adapter, sync }
    }

    /// Announce every configured folder mapping and its excludes.
    pub fn announce(&self, targets: &[SyncTarget]) {
        let events = self.sync.events();
        for target in targets {
            let machine = target.machine().name().to_string();
            events.on_event(SyncEvent::FolderConfigured {
                machine: machine.clone(),
                guestpath: target.guestpath().to_string(),
                hostpath: target.hostpath().to_string(),
            });
            if !target.excludes().is_empty() {
                events.on_event(SyncEvent::ExcludesConfigured {
                    machine,
                    excludes: target.excludes().to_vec(),
                });
            }
        }
    }

    /// Fully mirror every target once, auto or not.
    ///
    /// Failures are reported and do not stop the remaining targets.
    pub fn initial_sync(&self, targets: &[SyncTarget], options: &SyncOptions) -> Vec<SyncReport> {
        let mut announced: Vec<&str> = Vec::new();
        let mut reports = Vec::with_capacity(targets.len());

        for target in targets {
            let machine = target.machine().name();
            if !announced.contains(&machine) {
                announced.push(machine);
                self.sync.events().on_event(SyncEvent::InitialSync {
                    machine: machine.to_string(),
                });
            }
            reports.push(self.sync.sync_full(target, options));
        }

        reports
    }

    /// Watch every auto-synced root until `shutdown` yields a token (or its
    /// sender goes away), then stop every watcher.
    pub fn run(
        &self,
        targets: &[SyncTarget],
        options: &WatchOptions,
        shutdown: Receiver<()>,
    ) -> ReflectResult<()> {
        let roots = group_by_root(targets);
        if roots.is_empty() {
            self.sync.events().on_event(SyncEvent::NothingToWatch);
            return Err(ReflectError::NoFoldersToWatch);
        }

        let mut watchers: Vec<Box<dyn Watcher>> = Vec::with_capacity(roots.len());
        for (root, bound) in roots {
            for target in &bound {
                self.sync.events().on_event(SyncEvent::Watching {
                    machine: target.machine().name().to_string(),
                    path: root.to_string(),
                });
            }

            let settings = WatchSettings {
                excludes: root_excludes(&bound),
                force_polling: options.force_polling,
                debounce: options.debounce,
                ..WatchSettings::default()
            };
            debug!(
                %root,
                targets = bound.len(),
                excludes = settings.excludes.len(),
                "binding watcher"
            );

            let sync = Arc::clone(&self.sync);
            let sync_options = options.sync;
            let callback_root = root.clone();
            let watcher = self.adapter.watch(
                &root,
                settings,
                Box::new(move |batch: ChangeBatch| {
                    sync.dispatch(&callback_root, &bound, &batch, &sync_options);
                }),
            )?;
            watchers.push(watcher);
        }

        if let Err(e) = watchers.iter_mut().try_for_each(|w| w.start()) {
            warn!(error = %e, "watcher failed to start, stopping the others");
            stop_all(&mut watchers);
            return Err(e);
        }
        info!(watchers = watchers.len(), "watching");

        // A dropped sender means nobody can interrupt us anymore; treat it as
        // a shutdown request too.
        let _ = shutdown.recv();

        stop_all(&mut watchers);
        self.sync.events().on_event(SyncEvent::Shutdown);
        Ok(())
    }
}

/// Every exclude pattern of every target bound to one root, deduplicated.
fn root_excludes(targets: &[SyncTarget]) -> Vec<ExcludePattern> {
    let mut excludes: Vec<ExcludePattern> = Vec::new();
    for pattern in targets.iter().flat_map(|t| t.exclude_matchers()) {
        if !excludes.contains(pattern) {
            excludes.push(pattern.clone());
        }
    }
    excludes
}

fn stop_all(watchers: &mut [Box<dyn Watcher>]) {
    for watcher in watchers.iter_mut() {
        if watcher.state() != WatcherState::Stopped {
            watcher.stop();
        }
    }
}
