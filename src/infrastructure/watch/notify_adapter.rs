//! Watch adapter backed by the `notify` crate
//!
//! Raw notify events are funnelled into one worker thread per root. The worker
//! waits for a quiet period, coalesces what it saw into a [`ChangeBatch`] and
//! hands it to the callback. Delivery is therefore serialized per root.
//! A root that never goes quiet still delivers once `max_delay` has passed
//! since its first pending change.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use ignore::WalkBuilder;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{
    Config, Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher as _,
};
use tracing::{debug, trace, warn};

use crate::domain::ports::{ChangeCallback, WatchAdapter, WatchSettings, Watcher, WatcherState};
use crate::domain::value_objects::{is_excluded, ChangeBatch, ExcludePattern, WatchedRoot};
use crate::error::{ReflectError, ReflectResult};

/// Interval between scans when polling is forced
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Creates notify-backed watchers
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyWatchAdapter;

impl NotifyWatchAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl WatchAdapter for NotifyWatchAdapter {
    fn watch(
        &self,
        root: &WatchedRoot,
        settings: WatchSettings,
        on_change: ChangeCallback,
    ) -> ReflectResult<Box<dyn Watcher>> {
        if !root.as_path().is_dir() {
            return Err(watch_error(root, "not a directory"));
        }
        Ok(Box::new(NotifyWatcher {
            root: root.clone(),
            settings,
            callback: Some(on_change),
            backend: None,
            control: None,
            worker: None,
            state: WatcherState::Initializing,
        }))
    }
}

enum Message {
    Event(notify::Result<Event>),
    Stop,
}

enum Backend {
    Native(RecommendedWatcher),
    Poll(PollWatcher),
}

impl Backend {
    fn create(force_polling: bool, tx: Sender<Message>) -> notify::Result<Self> {
        let handler = move |res: notify::Result<Event>| {
            // The worker is gone once the watcher is stopping
            let _ = tx.send(Message::Event(res));
        };
        if force_polling {
            let config = Config::default().with_poll_interval(POLL_INTERVAL);
            Ok(Self::Poll(PollWatcher::new(handler, config)?))
        } else {
            Ok(Self::Native(RecommendedWatcher::new(
                handler,
                Config::default(),
            )?))
        }
    }

    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        match self {
            Self::Native(w) => w.watch(path, RecursiveMode::Recursive),
            Self::Poll(w) => w.watch(path, RecursiveMode::Recursive),
        }
    }

    fn unwatch(&mut self, path: &Path) -> notify::Result<()> {
        match self {
            Self::Native(w) => w.unwatch(path),
            Self::Poll(w) => w.unwatch(path),
        }
    }
}

/// One recursive watch over one root
pub struct NotifyWatcher {
    root: WatchedRoot,
    settings: WatchSettings,
    callback: Option<ChangeCallback>,
    backend: Option<Backend>,
    control: Option<Sender<Message>>,
    worker: Option<JoinHandle<()>>,
    state: WatcherState,
}

impl Watcher for NotifyWatcher {
    fn start(&mut self) -> ReflectResult<()> {
        let callback = match self.callback.take() {
            Some(callback) => callback,
            None => return Err(watch_error(&self.root, "watcher cannot be restarted")),
        };

        let (tx, rx) = channel();
        let mut backend = Backend::create(self.settings.force_polling, tx.clone())
            .map_err(|e| watch_error(&self.root, e))?;
        backend
            .watch(self.root.as_path())
            .map_err(|e| watch_error(&self.root, e))?;

        let worker = Worker {
            root: self.root.clone(),
            excludes: self.settings.excludes.clone(),
            debounce: self.settings.debounce,
            max_delay: self.settings.max_delay.max(self.settings.debounce),
            callback,
        };
        let handle = thread::Builder::new()
            .name(format!("reflect-watch {}", self.root))
            .spawn(move || worker.run(rx))?;

        debug!(
            root = %self.root,
            polling = self.settings.force_polling,
            "watcher started"
        );
        self.backend = Some(backend);
        self.control = Some(tx);
        self.worker = Some(handle);
        self.state = WatcherState::Running;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            if let Err(e) = backend.unwatch(self.root.as_path()) {
                debug!(root = %self.root, error = %e, "unwatch failed");
            }
        }
        if let Some(control) = self.control.take() {
            let _ = control.send(Message::Stop);
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(root = %self.root, "watch worker panicked");
            }
        }
        self.state = WatcherState::Stopped;
        debug!(root = %self.root, "watcher stopped");
    }

    fn state(&self) -> WatcherState {
        self.state
    }
}

impl Drop for NotifyWatcher {
    fn drop(&mut self) {
        if self.state == WatcherState::Running {
            self.stop();
        }
    }
}

struct Worker {
    root: WatchedRoot,
    excludes: Vec<ExcludePattern>,
    debounce: Duration,
    max_delay: Duration,
    callback: ChangeCallback,
}

impl Worker {
    fn run(mut self, rx: Receiver<Message>) {
        let mut pending = ChangeAccumulator::default();
        // Set while changes are pending; a flush happens no later than this
        let mut deadline: Option<Instant> = None;
        loop {
            let message = match deadline {
                None => rx.recv().ok(),
                Some(at) => {
                    let wait = self.debounce.min(at.saturating_duration_since(Instant::now()));
                    match rx.recv_timeout(wait) {
                        Ok(message) => Some(message),
                        Err(RecvTimeoutError::Timeout) => {
                            self.flush(&mut pending);
                            deadline = None;
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => None,
                    }
                }
            };

            match message {
                Some(Message::Event(Ok(event))) => pending.record(&event),
                Some(Message::Event(Err(e))) => warn!(root = %self.root, error = %e, "watch error"),
                Some(Message::Stop) | None => break,
            }

            match deadline {
                None if !pending.is_empty() => deadline = Some(Instant::now() + self.max_delay),
                Some(at) if Instant::now() >= at => {
                    trace!(root = %self.root, "root still busy, delivering at deadline");
                    self.flush(&mut pending);
                    deadline = None;
                }
                _ => {}
            }
        }
    }

    fn flush(&mut self, pending: &mut ChangeAccumulator) {
        let batch = pending.drain(&self.root, &self.excludes);
        if batch.is_empty() {
            trace!(root = %self.root, "quiet period ended with nothing to report");
            return;
        }
        (self.callback)(batch);
    }
}

#[derive(Debug, Clone, Copy)]
struct Seen {
    created_first: bool,
    directory: bool,
}

/// Coalesces raw events per path until the next quiet period.
///
/// Only the first event kind of a path is remembered; the final state is
/// read from the host when the batch is built.
#[derive(Debug, Default)]
pub struct ChangeAccumulator {
    paths: BTreeMap<PathBuf, Seen>,
}

impl ChangeAccumulator {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn record(&mut self, event: &Event) {
        match event.kind {
            EventKind::Access(_) => {}
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() >= 2 => {
                self.see(&event.paths[0], false, false);
                self.see(&event.paths[1], true, false);
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                for path in &event.paths {
                    self.see(path, true, false);
                }
            }
            EventKind::Create(kind) => {
                for path in &event.paths {
                    self.see(path, true, kind == CreateKind::Folder);
                }
            }
            EventKind::Remove(kind) => {
                for path in &event.paths {
                    self.see(path, false, kind == RemoveKind::Folder);
                }
            }
            _ => {
                for path in &event.paths {
                    self.see(path, false, false);
                }
            }
        }
    }

    fn see(&mut self, path: &Path, created: bool, directory: bool) {
        let seen = self.paths.entry(path.to_path_buf()).or_insert(Seen {
            created_first: created,
            directory: false,
        });
        seen.directory |= directory;
    }

    /// Build the batch for everything seen so far and forget it.
    ///
    /// Paths outside the root and excluded paths are dropped. A directory
    /// that appeared is walked and every file inside is reported as added,
    /// since a moved-in tree raises no events for its contents. A path
    /// created and removed again within the window is not reported.
    pub fn drain(&mut self, root: &WatchedRoot, excludes: &[ExcludePattern]) -> ChangeBatch {
        let mut modified = Vec::new();
        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut reported = BTreeSet::new();
        let mut swept = BTreeSet::new();

        for (path, seen) in std::mem::take(&mut self.paths) {
            let absolute = path.to_string_lossy().into_owned();
            let Some(rel) = root.relative(&absolute) else {
                continue;
            };
            if is_excluded(excludes, rel) {
                trace!(path = rel, "excluded");
                continue;
            }

            match fs::symlink_metadata(&path) {
                Ok(meta) if meta.is_dir() => {
                    if seen.created_first {
                        sweep(&path, root, excludes, &mut swept);
                    }
                }
                Ok(_) if seen.created_first => {
                    reported.insert(absolute.clone());
                    added.push(absolute);
                }
                Ok(_) => {
                    reported.insert(absolute.clone());
                    modified.push(absolute);
                }
                Err(_) if seen.created_first || seen.directory => {}
                Err(_) => removed.push(absolute),
            }
        }

        added.extend(swept.into_iter().filter(|path| !reported.contains(path)));
        ChangeBatch::new(modified, added, removed)
    }
}

/// Collect every non-excluded file below `dir`, pruning excluded directories.
fn sweep(dir: &Path, root: &WatchedRoot, excludes: &[ExcludePattern], into: &mut BTreeSet<String>) {
    let prune_root = root.clone();
    let prune_excludes = excludes.to_vec();
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let absolute = entry.path().to_string_lossy();
            match prune_root.relative(&absolute) {
                Some(rel) => !is_excluded(&prune_excludes, rel),
                None => false,
            }
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_some_and(|kind| !kind.is_dir()) {
            into.insert(entry.path().to_string_lossy().into_owned());
        }
    }
}

fn watch_error(root: &WatchedRoot, message: impl ToString) -> ReflectError {
    ReflectError::Watch {
        root: root.as_path().to_path_buf(),
        message: message.to_string(),
    }
}
