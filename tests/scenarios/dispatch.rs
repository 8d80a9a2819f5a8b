//! Batches dispatched through real child processes.

use std::fs;
use std::sync::Arc;

use reflect::domain::ports::SyncEvent;
use reflect::domain::value_objects::{ChangeBatch, CommandKind, WatchedRoot};
use reflect::infrastructure::{LocalHostFs, SystemCommandRunner};
use reflect::{SyncOptions, SyncUseCase};

use crate::common::*;

fn use_case(transport: Arc<ShellTransport>, sink: Arc<RecordingSink>) -> SyncUseCase {
    SyncUseCase::new(
        Arc::new(SystemCommandRunner::new()),
        transport,
        Arc::new(UpResolver),
        Arc::new(LocalHostFs::new()),
        sink,
    )
}

#[test]
fn incremental_batch_reaches_every_target() {
    let (_host, host) = canonical_tempdir();
    let logs = tempfile::tempdir().unwrap();
    let transport = Arc::new(ShellTransport::new(logs.path()));
    let sink = Arc::new(RecordingSink::default());
    let sync = use_case(transport.clone(), sink.clone());

    let root = WatchedRoot::new(&host);
    let abs = |rel: &str| format!("{}{rel}", root.as_str());
    let batch = ChangeBatch::new(vec![abs("src/lib.rs")], vec![abs("README.md")], vec![]);

    let reports = sync.dispatch(
        &root,
        &[target("web", &host, "/srv/web/"), target("db", &host, "/srv/db/")],
        &batch,
        &SyncOptions::default(),
    );

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_success()));
    assert_eq!(
        read_log(&transport.log_path(CommandKind::IncrementalMirror)),
        "src/lib.rs\nREADME.md\nsrc/lib.rs\nREADME.md\n"
    );
    assert_eq!(
        sink.count(|e| matches!(e, SyncEvent::Synced { .. })),
        2
    );
}

#[test]
fn pure_delete_removes_files_and_vanished_directories() {
    let (_host, host) = canonical_tempdir();
    fs::create_dir_all(host.join("keep")).unwrap();
    let logs = tempfile::tempdir().unwrap();
    let transport = Arc::new(ShellTransport::new(logs.path()).with_pure_delete());
    let sink = Arc::new(RecordingSink::default());
    let sync = use_case(transport.clone(), sink.clone());

    let root = WatchedRoot::new(&host);
    let abs = |rel: &str| format!("{}{rel}", root.as_str());
    let batch = ChangeBatch::new(
        vec![],
        vec![],
        vec![abs("gone/deep/a.txt"), abs("gone/b.txt"), abs("keep/c.txt")],
    );

    let reports = sync.dispatch(
        &root,
        &[target("web", &host, "/vagrant")],
        &batch,
        &SyncOptions::default(),
    );

    assert!(reports[0].is_success());
    assert_eq!(
        read_log(&transport.log_path(CommandKind::RemoteFileRemove)),
        "/vagrant/gone/deep/a.txt\n/vagrant/gone/b.txt\n/vagrant/keep/c.txt\n"
    );
    assert_eq!(
        read_log(&transport.log_path(CommandKind::RemoteDirRemove)),
        "/vagrant/gone/deep\n/vagrant/gone\n"
    );
    assert!(read_log(&transport.log_path(CommandKind::FullMirror)).is_empty());
    assert_eq!(
        sink.count(|e| matches!(e, SyncEvent::RemoteRemove { .. })),
        3
    );
}

#[test]
fn removals_without_pure_delete_mirror_the_whole_root() {
    let (_host, host) = canonical_tempdir();
    let logs = tempfile::tempdir().unwrap();
    let transport = Arc::new(ShellTransport::new(logs.path()));
    let sink = Arc::new(RecordingSink::default());
    let sync = use_case(transport.clone(), sink);

    let root = WatchedRoot::new(&host);
    let batch = ChangeBatch::new(vec![], vec![], vec![format!("{}old.txt", root.as_str())]);
    sync.dispatch(
        &root,
        &[target("web", &host, "/vagrant/")],
        &batch,
        &SyncOptions::default(),
    );

    assert_eq!(
        read_log(&transport.log_path(CommandKind::FullMirror)),
        "web /vagrant/\n"
    );
    assert!(read_log(&transport.log_path(CommandKind::RemoteFileRemove)).is_empty());
}
