use shipgate_core::{VersionRecord, VersionVerdict};
use tracing::{debug, info};

use crate::error::FetchError;
use crate::traits::VersionFetcher;

/// Decides whether the locally declared version is newer than the last
/// published one.
pub struct VersionGate<F> {
    fetcher: F,
}

impl<F> VersionGate<F>
where
    F: VersionFetcher,
{
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches the published version once and compares `local` against it.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the remote source is unreachable or malformed.
    /// The fetch is not retried.
    pub fn check(&self, local: &VersionRecord) -> Result<VersionVerdict, FetchError> {
        let remote = self.fetcher.fetch()?;
        debug!(
            local = %local.semver,
            remote = %remote.semver,
            source = %self.fetcher.location(),
            "fetched published version"
        );

        let verdict = shipgate_version::compare(&local.semver, &remote.semver);
        info!(
            name = %local.name,
            changed = verdict.changed,
            kind = %verdict.change_kind,
            "version gate decided"
        );
        Ok(verdict)
    }
}
