//! A watcher driving real commands until shutdown.

use std::fs;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reflect::domain::ports::SyncEvent;
use reflect::domain::value_objects::CommandKind;
use reflect::infrastructure::{LocalHostFs, NotifyWatchAdapter, SystemCommandRunner};
use reflect::{ReflectError, SyncUseCase, WatchOptions, WatchUseCase};

use crate::common::*;

fn watch_use_case(transport: Arc<ShellTransport>, sink: Arc<RecordingSink>) -> WatchUseCase {
    let sync = SyncUseCase::new(
        Arc::new(SystemCommandRunner::new()),
        transport,
        Arc::new(UpResolver),
        Arc::new(LocalHostFs::new()),
        sink,
    );
    WatchUseCase::new(Arc::new(NotifyWatchAdapter::new()), Arc::new(sync))
}

#[test]
fn new_files_are_streamed_and_excludes_are_skipped() {
    let (_host, host) = canonical_tempdir();
    let logs = tempfile::tempdir().unwrap();
    let transport = Arc::new(ShellTransport::new(logs.path()));
    let sink = Arc::new(RecordingSink::default());
    let watch = watch_use_case(transport.clone(), sink.clone());

    let targets = vec![target("web", &host, "/vagrant/").with_excludes(vec!["*.log".to_string()])];
    let options = WatchOptions::default().with_debounce(Duration::from_millis(50));

    let (stop, shutdown) = mpsc::channel();
    let runner = thread::spawn(move || watch.run(&targets, &options, shutdown));

    // Give the backend time to register the root
    thread::sleep(Duration::from_millis(300));
    fs::write(host.join("debug.log"), "noise").unwrap();
    fs::write(host.join("hello.txt"), "hi").unwrap();

    let incremental = transport.log_path(CommandKind::IncrementalMirror);
    assert!(
        wait_until(Duration::from_secs(10), || read_log(&incremental)
            .contains("hello.txt")),
        "hello.txt never reached the transport"
    );

    stop.send(()).unwrap();
    runner.join().unwrap().unwrap();

    assert!(!read_log(&incremental).contains("debug.log"));
    let events = sink.events();
    assert!(events.contains(&SyncEvent::Watching {
        machine: "web".to_string(),
        path: format!("{}/", host.display()),
    }));
    assert_eq!(events.last(), Some(&SyncEvent::Shutdown));
}

#[test]
fn nothing_to_watch_when_no_folder_is_automatic() {
    let (_host, host) = canonical_tempdir();
    let logs = tempfile::tempdir().unwrap();
    let transport = Arc::new(ShellTransport::new(logs.path()));
    let sink = Arc::new(RecordingSink::default());
    let watch = watch_use_case(transport, sink.clone());

    let targets = vec![target("web", &host, "/vagrant/").with_auto(false)];
    let (_stop, shutdown) = mpsc::channel();
    let result = watch.run(&targets, &WatchOptions::default(), shutdown);

    assert!(matches!(result, Err(ReflectError::NoFoldersToWatch)));
    assert_eq!(sink.events(), vec![SyncEvent::NothingToWatch]);
}

#[test]
fn initial_sync_mirrors_each_target_once() {
    let (_host, host) = canonical_tempdir();
    let logs = tempfile::tempdir().unwrap();
    let transport = Arc::new(ShellTransport::new(logs.path()));
    let sink = Arc::new(RecordingSink::default());
    let watch = watch_use_case(transport.clone(), sink);

    let targets = vec![
        target("web", &host, "/vagrant/"),
        target("web", &host, "/srv/"),
        target("db", &host, "/data/"),
    ];
    let reports = watch.initial_sync(&targets, &WatchOptions::default().sync);

    assert_eq!(reports.len(), 3);
    assert_eq!(
        read_log(&transport.log_path(CommandKind::FullMirror)),
        "web /vagrant/\nweb /srv/\ndb /data/\n"
    );
}
