use shipgate_core::{VersionRecord, VersionVerdict};
use tracing::{debug, info};

use super::release_trigger::{ReleaseTrigger, RunResult};
use super::version_gate::VersionGate;
use crate::Result;
use crate::concurrency::RunGuard;
use crate::traits::{LocalVersionSource, PublishReport, Publisher, VersionFetcher};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseInput {
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The local version is not newer than the published one.
    Skipped(VersionVerdict),
    DryRun(VersionVerdict),
    Published {
        verdict: VersionVerdict,
        report: PublishReport,
    },
}

impl ReleaseOutcome {
    #[must_use]
    pub fn verdict(&self) -> &VersionVerdict {
        match self {
            Self::Skipped(verdict) | Self::DryRun(verdict) => verdict,
            Self::Published { verdict, .. } => verdict,
        }
    }
}

/// Read local version, gate against the published one, then publish when
/// the version moved forward.
///
/// Every step before the publish is a cancellation point for the run's
/// [`RunGuard`]; once the run enters its publish step it runs to completion.
pub struct ReleaseOperation<L, F, P> {
    local_source: L,
    gate: VersionGate<F>,
    trigger: ReleaseTrigger<P>,
}

impl<L, F, P> ReleaseOperation<L, F, P>
where
    L: LocalVersionSource,
    F: VersionFetcher,
    P: Publisher,
{
    pub fn new(local_source: L, fetcher: F, publisher: P) -> Self {
        Self {
            local_source,
            gate: VersionGate::new(fetcher),
            trigger: ReleaseTrigger::new(publisher),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the local version cannot be read, the published
    /// version cannot be fetched, the run is superseded before publishing, or
    /// the publish action fails.
    pub fn execute(&self, input: &ReleaseInput, run: &RunGuard) -> Result<ReleaseOutcome> {
        debug!(key = %run.key(), generation = run.generation(), "release run started");

        run.checkpoint()?;
        let local: VersionRecord = self.local_source.read_local()?;
        debug!(name = %local.name, version = %local.semver, "read local version");

        run.checkpoint()?;
        let verdict = self.gate.check(&local)?;
        run.checkpoint()?;

        if !verdict.changed {
            return Ok(ReleaseOutcome::Skipped(verdict));
        }

        if input.dry_run {
            info!(version = %verdict.new_version, "dry run, not publishing");
            return Ok(ReleaseOutcome::DryRun(verdict));
        }

        run.enter_publish()?;
        match self.trigger.run(&verdict)? {
            RunResult::Skipped => Ok(ReleaseOutcome::Skipped(verdict)),
            RunResult::Published(report) => Ok(ReleaseOutcome::Published { verdict, report }),
        }
    }
}
