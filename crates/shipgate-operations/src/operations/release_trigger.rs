use shipgate_core::VersionVerdict;
use tracing::info;

use crate::error::ActionError;
use crate::traits::{PublishReport, Publisher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Skipped,
    Published(PublishReport),
}

/// Invokes the publish action for changed verdicts only.
pub struct ReleaseTrigger<P> {
    publisher: P,
}

impl<P> ReleaseTrigger<P>
where
    P: Publisher,
{
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Publishes at most once per call; an unchanged verdict never reaches
    /// the publisher.
    ///
    /// # Errors
    ///
    /// Returns the publisher's `ActionError` unchanged.
    pub fn run(&self, verdict: &VersionVerdict) -> Result<RunResult, ActionError> {
        if !verdict.changed {
            info!(version = %verdict.previous, "version already published, skipping");
            return Ok(RunResult::Skipped);
        }

        info!(version = %verdict.new_version, kind = %verdict.change_kind, "publishing");
        let report = self.publisher.publish(verdict)?;
        Ok(RunResult::Published(report))
    }
}
