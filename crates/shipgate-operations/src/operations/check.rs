use shipgate_core::{VersionRecord, VersionVerdict};

use crate::Result;
use crate::operations::VersionGate;
use crate::traits::{LocalVersionSource, VersionFetcher};

#[derive(Debug, Clone)]
pub struct CheckOutput {
    pub local: VersionRecord,
    pub verdict: VersionVerdict,
}

/// Reads the local version and runs the gate without publishing.
pub struct CheckOperation<L, F> {
    local_source: L,
    gate: VersionGate<F>,
}

impl<L, F> CheckOperation<L, F>
where
    L: LocalVersionSource,
    F: VersionFetcher,
{
    pub fn new(local_source: L, fetcher: F) -> Self {
        Self {
            local_source,
            gate: VersionGate::new(fetcher),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the local version cannot be read or the published
    /// version cannot be fetched.
    pub fn execute(&self) -> Result<CheckOutput> {
        let local = self.local_source.read_local()?;
        let verdict = self.gate.check(&local)?;
        Ok(CheckOutput { local, verdict })
    }
}
