use shipgate_core::CategoryLabel;
use tracing::{debug, info};

use super::classify::{Classification, TitleClassifier};
use crate::Result;
use crate::error::ActionError;
use crate::traits::LabelSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    /// The title's type maps to no category; the sink was not called.
    Unlabeled,
    Applied(CategoryLabel),
}

/// Forwards a derived label to the sink, skipping the `none` sentinel.
pub struct LabelApplier<S> {
    sink: S,
}

impl<S> LabelApplier<S>
where
    S: LabelSink,
{
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// # Errors
    ///
    /// Returns the sink's `ActionError` unchanged.
    pub fn apply(&self, label: CategoryLabel) -> std::result::Result<LabelOutcome, ActionError> {
        if label.is_none() {
            debug!("no category label derived, nothing to apply");
            return Ok(LabelOutcome::Unlabeled);
        }

        self.sink.add_label(label)?;
        info!(%label, "applied label");
        Ok(LabelOutcome::Applied(label))
    }
}

#[derive(Debug, Clone)]
pub struct LabelReport {
    pub classification: Classification,
    pub outcome: LabelOutcome,
}

/// Classifies a title and applies its label. Nothing reaches the sink unless
/// classification succeeds.
pub struct LabelOperation<S> {
    classifier: TitleClassifier,
    applier: LabelApplier<S>,
}

impl<S> LabelOperation<S>
where
    S: LabelSink,
{
    pub fn new(classifier: TitleClassifier, sink: S) -> Self {
        Self {
            classifier,
            applier: LabelApplier::new(sink),
        }
    }

    /// # Errors
    ///
    /// Returns `OperationError::Title` if classification fails and
    /// `OperationError::Action` if the sink rejects the label.
    pub fn execute(&self, title: &str) -> Result<LabelReport> {
        let classification = self.classifier.classify(title)?;
        let outcome = self.applier.apply(classification.label)?;
        Ok(LabelReport {
            classification,
            outcome,
        })
    }
}
