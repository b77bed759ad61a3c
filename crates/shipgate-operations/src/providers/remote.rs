use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use shipgate_core::VersionRecord;
use shipgate_manifest::{DEFAULT_VERSION_POINTER, version_from_json};
use shipgate_project::RemoteLocation;
use tracing::debug;

use crate::error::FetchError;
use crate::traits::VersionFetcher;

const USER_AGENT: &str = concat!("shipgate/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn record_from_document(
    content: &str,
    pointer: &str,
    location: &str,
) -> Result<VersionRecord, FetchError> {
    let (name, version) =
        version_from_json(content, pointer).map_err(|source| FetchError::Malformed {
            location: location.to_string(),
            source,
        })?;

    Ok(VersionRecord::new(
        name.unwrap_or_else(|| location.to_string()),
        version,
    ))
}

/// Fetches a JSON document over HTTP(S), e.g. a registry's package metadata.
pub struct HttpVersionFetcher {
    client: Client,
    url: String,
    pointer: String,
}

impl HttpVersionFetcher {
    /// # Errors
    ///
    /// Returns `FetchError::Request` if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, pointer: Option<&str>) -> Result<Self, FetchError> {
        Self::with_timeout(url, pointer, DEFAULT_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns `FetchError::Request` if the HTTP client cannot be constructed.
    pub fn with_timeout(
        url: impl Into<String>,
        pointer: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let url = url.into();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            url,
            pointer: pointer.unwrap_or(DEFAULT_VERSION_POINTER).to_string(),
        })
    }
}

impl VersionFetcher for HttpVersionFetcher {
    fn fetch(&self) -> Result<VersionRecord, FetchError> {
        debug!(url = %self.url, pointer = %self.pointer, "fetching published version");

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| FetchError::Request {
            url: self.url.clone(),
            source,
        })?;

        record_from_document(&body, &self.pointer, &self.url)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Reads a JSON version document from disk.
pub struct FileVersionFetcher {
    path: PathBuf,
    pointer: String,
}

impl FileVersionFetcher {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, pointer: Option<&str>) -> Self {
        Self {
            path: path.into(),
            pointer: pointer.unwrap_or(DEFAULT_VERSION_POINTER).to_string(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionFetcher for FileVersionFetcher {
    fn fetch(&self) -> Result<VersionRecord, FetchError> {
        debug!(path = %self.path.display(), pointer = %self.pointer, "reading published version");

        let content = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Read {
            path: self.path.clone(),
            source,
        })?;

        record_from_document(&content, &self.pointer, &self.location())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetcher selected from a configured [`RemoteLocation`].
pub enum RemoteVersionFetcher {
    Http(HttpVersionFetcher),
    File(FileVersionFetcher),
}

impl RemoteVersionFetcher {
    /// # Errors
    ///
    /// Returns `FetchError::Request` if an HTTP client cannot be constructed.
    pub fn from_location(
        location: &RemoteLocation,
        pointer: Option<&str>,
    ) -> Result<Self, FetchError> {
        Ok(match location {
            RemoteLocation::Http(url) => Self::Http(HttpVersionFetcher::new(url.clone(), pointer)?),
            RemoteLocation::File(path) => {
                Self::File(FileVersionFetcher::new(path.clone(), pointer))
            }
        })
    }
}

impl VersionFetcher for RemoteVersionFetcher {
    fn fetch(&self) -> Result<VersionRecord, FetchError> {
        match self {
            Self::Http(fetcher) => fetcher.fetch(),
            Self::File(fetcher) => fetcher.fetch(),
        }
    }

    fn location(&self) -> String {
        match self {
            Self::Http(fetcher) => fetcher.location(),
            Self::File(fetcher) => fetcher.location(),
        }
    }
}
