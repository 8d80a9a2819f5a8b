//! Sync Use Case implementation

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::entities::SyncTarget;
use crate::domain::ports::{
    CommandRunner, HostFs, SyncEvent, SyncEventSink, TargetResolver, Transport,
};
use crate::domain::services::{select_strategy, SyncStrategy};
use crate::domain::value_objects::{ChangeBatch, WatchedRoot};
use crate::error::ReflectError;

use super::options::SyncOptions;
use super::result::SyncReport;
use super::transport::TargetTransport;

/// Sync Use Case
///
/// Turns one change batch for one root into transport commands for every
/// target bound to that root. Failures are scoped to a single target and
/// reported through the event sink; they never stop the caller.
pub struct SyncUseCase {
    runner: Arc<dyn CommandRunner>,
    transport: Arc<dyn Transport>,
    resolver: Arc<dyn TargetResolver>,
    host_fs: Arc<dyn HostFs>,
    events: Arc<dyn SyncEventSink>,
}

impl SyncUseCase {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        transport: Arc<dyn Transport>,
        resolver: Arc<dyn TargetResolver>,
        host_fs: Arc<dyn HostFs>,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        Self {
            runner,
            transport,
            resolver,
            host_fs,
            events,
        }
    }

    /// The sink every user-visible line goes to.
    pub fn events(&self) -> &Arc<dyn SyncEventSink> {
        &self.events
    }

    /// Dispatch one batch of absolute paths beneath `root` to `targets`.
    ///
    /// Batches must already be filtered by the targets' exclude patterns.
    pub fn dispatch(
        &self,
        root: &WatchedRoot,
        targets: &[SyncTarget],
        batch: &ChangeBatch,
        options: &SyncOptions,
    ) -> Vec<SyncReport> {
        let batch = batch.relative_to(root);
        info!(
            %root,
            modified = ?batch.modified(),
            added = ?batch.added(),
            removed = ?batch.removed(),
            "change batch"
        );

        if batch.is_empty() {
            return Vec::new();
        }

        let strategy = select_strategy(
            options.incremental,
            &batch,
            self.transport.supports_pure_delete(),
        );

        targets
            .iter()
            .map(|target| self.sync_target(target, strategy, &batch, options))
            .collect()
    }

    /// Full mirror of one target, without any change notices.
    ///
    /// Used for the sync that runs before watching starts.
    pub fn sync_full(&self, target: &SyncTarget, options: &SyncOptions) -> SyncReport {
        self.sync_target(target, SyncStrategy::Full, &ChangeBatch::default(), options)
    }

    fn sync_target(
        &self,
        target: &SyncTarget,
        strategy: SyncStrategy,
        batch: &ChangeBatch,
        options: &SyncOptions,
    ) -> SyncReport {
        let machine = target.machine().name();

        if self.resolver.machine_identity(target.machine()).is_none() {
            debug!(
                machine,
                guestpath = target.guestpath(),
                "machine has no identity, skipping"
            );
            return SyncReport::skipped(machine, target.guestpath());
        }

        let started = Instant::now();
        let transport =
            TargetTransport::new(target, self.transport.as_ref(), self.runner.as_ref());
        let errors = match strategy {
            SyncStrategy::Full => self.run_full(&transport, machine, batch),
            SyncStrategy::Incremental => self.run_incremental(&transport, machine, batch),
        };

        for error in &errors {
            self.report_error(machine, error);
        }

        if errors.is_empty() {
            let elapsed_ms = options
                .show_sync_time
                .then(|| started.elapsed().as_millis() as u64);
            self.events.on_event(SyncEvent::Synced {
                machine: machine.to_string(),
                elapsed_ms,
            });
        }

        SyncReport {
            machine: machine.to_string(),
            guestpath: target.guestpath().to_string(),
            strategy: Some(strategy),
            errors,
        }
    }

    fn run_full(
        &self,
        transport: &TargetTransport<'_>,
        machine: &str,
        batch: &ChangeBatch,
    ) -> Vec<ReflectError> {
        if self.events.wants_detailed_events() {
            for path in batch.removed() {
                self.events.on_event(SyncEvent::Removed {
                    machine: machine.to_string(),
                    path: path.clone(),
                });
            }
            for path in batch.changed() {
                self.events.on_event(SyncEvent::Changed {
                    machine: machine.to_string(),
                    path: path.clone(),
                });
            }
        }

        transport.sync_full().err().into_iter().collect()
    }

    fn run_incremental(
        &self,
        transport: &TargetTransport<'_>,
        machine: &str,
        batch: &ChangeBatch,
    ) -> Vec<ReflectError> {
        let detailed = self.events.wants_detailed_events();
        let mut errors = Vec::new();

        if batch.has_changes() {
            let items = batch.changed().cloned().collect();
            let result = transport.sync_incremental(items, |path| {
                if detailed {
                    self.events.on_event(SyncEvent::Incremental {
                        machine: machine.to_string(),
                        path: path.to_string(),
                    });
                }
            });
            errors.extend(result.err());
        }

        if batch.has_removals() {
            let result = transport.sync_removals(batch.removed(), self.host_fs.as_ref(), |path| {
                if detailed {
                    self.events.on_event(SyncEvent::RemoteRemove {
                        machine: machine.to_string(),
                        path: path.to_string(),
                    });
                }
            });
            errors.extend(result.err());
        }

        errors
    }

    fn report_error(&self, machine: &str, error: &ReflectError) {
        let event = if error.is_guest_not_ready() {
            SyncEvent::Warning {
                machine: machine.to_string(),
                message: error.to_string(),
            }
        } else {
            SyncEvent::Error {
                machine: machine.to_string(),
                message: error.to_string(),
            }
        };
        self.events.on_event(event);
    }
}
