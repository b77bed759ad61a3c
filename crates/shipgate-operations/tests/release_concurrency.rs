use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use semver::Version;
use shipgate_core::{ConcurrencyKey, VersionRecord, VersionVerdict};
use shipgate_operations::concurrency::RunRegistry;
use shipgate_operations::operations::{ReleaseInput, ReleaseOperation, ReleaseOutcome};
use shipgate_operations::traits::{LocalVersionSource, PublishReport, Publisher, VersionFetcher};
use shipgate_operations::{ActionError, FetchError, OperationError};

fn key() -> ConcurrencyKey {
    ConcurrencyKey::new("release-main").expect("valid key")
}

fn record(version: &str) -> VersionRecord {
    VersionRecord::new("oxlint", version.parse().expect("valid version"))
}

struct StaticSource(VersionRecord);

impl LocalVersionSource for StaticSource {
    fn read_local(&self) -> shipgate_operations::Result<VersionRecord> {
        Ok(self.0.clone())
    }
}

struct StaticFetcher(VersionRecord);

impl VersionFetcher for StaticFetcher {
    fn fetch(&self) -> Result<VersionRecord, FetchError> {
        Ok(self.0.clone())
    }

    fn location(&self) -> String {
        "static".to_string()
    }
}

/// Signals when a fetch starts and holds it open until released.
struct GatedFetcher {
    record: VersionRecord,
    started: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl VersionFetcher for GatedFetcher {
    fn fetch(&self) -> Result<VersionRecord, FetchError> {
        self.started.lock().expect("lock").send(()).expect("send");
        self.release.lock().expect("lock").recv().expect("recv");
        Ok(self.record.clone())
    }

    fn location(&self) -> String {
        "gated".to_string()
    }
}

#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn push(&self, event: String) {
        self.0.lock().expect("lock").push(event);
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().expect("lock").clone()
    }
}

struct LoggingPublisher {
    log: EventLog,
    started: Option<Mutex<Sender<()>>>,
    release: Option<Mutex<Receiver<()>>>,
}

impl LoggingPublisher {
    fn new(log: EventLog) -> Self {
        Self {
            log,
            started: None,
            release: None,
        }
    }

    fn gated(log: EventLog, started: Sender<()>, release: Receiver<()>) -> Self {
        Self {
            log,
            started: Some(Mutex::new(started)),
            release: Some(Mutex::new(release)),
        }
    }
}

impl Publisher for LoggingPublisher {
    fn publish(&self, verdict: &VersionVerdict) -> Result<PublishReport, ActionError> {
        self.log.push(format!("start {}", verdict.new_version));
        if let Some(started) = &self.started {
            started.lock().expect("lock").send(()).expect("send");
        }
        if let Some(release) = &self.release {
            release.lock().expect("lock").recv().expect("recv");
        }
        self.log.push(format!("end {}", verdict.new_version));
        Ok(PublishReport {
            action: format!("published {}", verdict.new_version),
            output: None,
        })
    }
}

#[test]
fn run_superseded_during_fetch_never_publishes() {
    let registry = RunRegistry::new();
    let log = EventLog::default();
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();

    let first_op = ReleaseOperation::new(
        StaticSource(record("1.1.0")),
        GatedFetcher {
            record: record("1.0.0"),
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        },
        LoggingPublisher::new(log.clone()),
    );
    let second_op = ReleaseOperation::new(
        StaticSource(record("1.1.0")),
        StaticFetcher(record("1.0.0")),
        LoggingPublisher::new(log.clone()),
    );

    let first_run = registry.begin(key());

    thread::scope(|s| {
        let first = s.spawn(move || first_op.execute(&ReleaseInput::default(), &first_run));
        started_rx.recv().expect("first run is fetching");

        let second_run = registry.begin(key());
        let second = s.spawn(move || second_op.execute(&ReleaseInput::default(), &second_run));

        release_tx.send(()).expect("release first fetch");

        let first_result = first.join().expect("first thread completes");
        assert!(matches!(first_result, Err(OperationError::Superseded(_))));

        let second_result = second.join().expect("second thread completes");
        assert!(matches!(second_result, Ok(ReleaseOutcome::Published { .. })));
    });

    assert_eq!(log.events(), vec!["start 1.1.0", "end 1.1.0"]);
    assert_eq!(registry.live_runs(&key()), 0);
}

#[test]
fn newer_run_waits_for_publish_in_progress() {
    let registry = RunRegistry::new();
    let log = EventLog::default();
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel();

    let first_op = ReleaseOperation::new(
        StaticSource(record("1.1.0")),
        StaticFetcher(record("1.0.0")),
        LoggingPublisher::gated(log.clone(), started_tx, release_rx),
    );
    let second_op = ReleaseOperation::new(
        StaticSource(record("1.2.0")),
        StaticFetcher(record("1.0.0")),
        LoggingPublisher::new(log.clone()),
    );

    let first_run = registry.begin(key());

    thread::scope(|s| {
        let first = s.spawn(move || first_op.execute(&ReleaseInput::default(), &first_run));
        started_rx.recv().expect("first run is publishing");

        let second_run = registry.begin(key());
        let second = s.spawn(move || {
            let result = second_op.execute(&ReleaseInput::default(), &second_run);
            done_tx.send(()).expect("send");
            result
        });

        assert!(
            done_rx.recv_timeout(Duration::from_millis(100)).is_err(),
            "newer run must not publish while an older publish is running"
        );

        release_tx.send(()).expect("release first publish");

        let first_result = first.join().expect("first thread completes");
        assert!(matches!(first_result, Ok(ReleaseOutcome::Published { .. })));

        let second_result = second.join().expect("second thread completes");
        assert!(matches!(second_result, Ok(ReleaseOutcome::Published { .. })));
    });

    assert_eq!(
        log.events(),
        vec!["start 1.1.0", "end 1.1.0", "start 1.2.0", "end 1.2.0"]
    );
}

#[test]
fn runs_with_different_keys_are_independent() {
    let registry = RunRegistry::new();
    let log = EventLog::default();
    let operation = ReleaseOperation::new(
        StaticSource(record("2.0.0")),
        StaticFetcher(record("1.9.9")),
        LoggingPublisher::new(log.clone()),
    );

    let main = registry.begin(ConcurrencyKey::new("release-main").expect("valid key"));
    let _next = registry.begin(ConcurrencyKey::new("release-next").expect("valid key"));

    let outcome = operation
        .execute(&ReleaseInput::default(), &main)
        .expect("release succeeds");

    assert_eq!(outcome.verdict().new_version, Version::new(2, 0, 0));
    assert_eq!(log.events(), vec!["start 2.0.0", "end 2.0.0"]);
}
