use shipgate_core::VersionVerdict;

use crate::error::ActionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub action: String,
    /// Captured output of the action, if it produced any.
    pub output: Option<String>,
}

/// The external publish step. Not assumed to be idempotent.
pub trait Publisher: Send + Sync {
    /// # Errors
    ///
    /// Returns `ActionError` if the publish action fails; callers surface it unchanged.
    fn publish(&self, verdict: &VersionVerdict) -> Result<PublishReport, ActionError>;
}
