use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use semver::Version;
use shipgate_core::{CategoryLabel, VersionRecord, VersionVerdict};
use shipgate_manifest::ManifestError;

use crate::Result;
use crate::error::{ActionError, FetchError};
use crate::traits::{LabelSink, LocalVersionSource, PublishReport, Publisher, VersionFetcher};

/// # Panics
///
/// Panics if the version string is not valid semver.
#[must_use]
pub fn record(name: &str, version: &str) -> VersionRecord {
    VersionRecord::new(name, version.parse::<Version>().expect("valid version"))
}

pub struct MockVersionSource {
    record: Option<VersionRecord>,
}

impl MockVersionSource {
    #[must_use]
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            record: Some(record(name, version)),
        }
    }

    #[must_use]
    pub fn missing() -> Self {
        Self { record: None }
    }
}

impl LocalVersionSource for MockVersionSource {
    fn read_local(&self) -> Result<VersionRecord> {
        self.record.clone().ok_or_else(|| {
            ManifestError::MissingField {
                path: PathBuf::from("/mock/Cargo.toml"),
                field: "package.version".to_string(),
            }
            .into()
        })
    }
}

pub struct MockFetcher {
    record: Option<VersionRecord>,
    calls: Arc<Mutex<usize>>,
}

impl MockFetcher {
    #[must_use]
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            record: Some(record(name, version)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Fails every fetch with HTTP 503.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            record: None,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("lock poisoned")
    }
}

impl VersionFetcher for MockFetcher {
    fn fetch(&self) -> std::result::Result<VersionRecord, FetchError> {
        *self.calls.lock().expect("lock poisoned") += 1;
        self.record.clone().ok_or_else(|| FetchError::Status {
            url: self.location(),
            status: 503,
        })
    }

    fn location(&self) -> String {
        "mock://registry".to_string()
    }
}

#[derive(Clone, Default)]
pub struct MockPublisher {
    published: Arc<Mutex<Vec<Version>>>,
    failure: Option<String>,
}

impl MockPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(diagnostic: &str) -> Self {
        Self {
            published: Arc::default(),
            failure: Some(diagnostic.to_string()),
        }
    }

    /// Versions passed to `publish`, including failed attempts.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn published(&self) -> Vec<Version> {
        self.published.lock().expect("lock poisoned").clone()
    }
}

impl Publisher for MockPublisher {
    fn publish(&self, verdict: &VersionVerdict) -> std::result::Result<PublishReport, ActionError> {
        self.published
            .lock()
            .expect("lock poisoned")
            .push(verdict.new_version.clone());

        if let Some(diagnostic) = &self.failure {
            return Err(ActionError::Failed {
                command: "mock publish".to_string(),
                status: "exit status: 1".to_string(),
                diagnostic: diagnostic.clone(),
            });
        }

        Ok(PublishReport {
            action: format!("published {}", verdict.new_version),
            output: None,
        })
    }
}

#[derive(Clone, Default)]
pub struct MockLabelSink {
    labels: Arc<Mutex<Vec<CategoryLabel>>>,
    reject: bool,
}

impl MockLabelSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            labels: Arc::default(),
            reject: true,
        }
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn labels(&self) -> Vec<CategoryLabel> {
        self.labels.lock().expect("lock poisoned").clone()
    }
}

impl LabelSink for MockLabelSink {
    fn add_label(&self, label: CategoryLabel) -> std::result::Result<(), ActionError> {
        self.labels.lock().expect("lock poisoned").push(label);

        if self.reject {
            return Err(ActionError::Rejected {
                action: format!("add label '{label}'"),
                reason: "label store is read-only".to_string(),
            });
        }
        Ok(())
    }
}
