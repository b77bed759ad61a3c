mod check;
mod classify;
mod label;
mod release;
mod release_trigger;
mod version_gate;

pub use check::{CheckOperation, CheckOutput};
pub use classify::{Classification, TitleClassifier};
pub use label::{LabelApplier, LabelOperation, LabelOutcome, LabelReport};
pub use release::{ReleaseInput, ReleaseOperation, ReleaseOutcome};
pub use release_trigger::{ReleaseTrigger, RunResult};
pub use version_gate::VersionGate;
