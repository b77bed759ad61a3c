use shipgate_core::CategoryLabel;

use crate::error::ActionError;

/// Attaches a category label to the change request being classified.
pub trait LabelSink: Send + Sync {
    /// # Errors
    ///
    /// Returns `ActionError` if the label store rejects the call.
    fn add_label(&self, label: CategoryLabel) -> Result<(), ActionError>;
}
