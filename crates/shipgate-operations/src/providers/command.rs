use std::path::PathBuf;
use std::process::Command;

use shipgate_core::{CategoryLabel, VersionVerdict};
use shipgate_project::CommandSpec;
use tracing::debug;

use crate::error::ActionError;
use crate::traits::{LabelSink, PublishReport, Publisher};

fn run(
    spec: &CommandSpec,
    args: Vec<String>,
    working_dir: Option<&PathBuf>,
) -> Result<Option<String>, ActionError> {
    let rendered = std::iter::once(spec.program().to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    debug!(command = %rendered, "running command");

    let mut command = Command::new(spec.program());
    command.args(&args);
    if let Some(dir) = working_dir {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|source| ActionError::Spawn {
        command: rendered.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let diagnostic = [stderr, stdout]
            .into_iter()
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| "no output".to_string());
        return Err(ActionError::Failed {
            command: rendered,
            status: output.status.to_string(),
            diagnostic,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok((!stdout.is_empty()).then_some(stdout))
}

/// Publishes by running a configured command; `{version}` in its arguments
/// is replaced with the new version.
pub struct CommandPublisher {
    command: CommandSpec,
    working_dir: Option<PathBuf>,
}

impl CommandPublisher {
    #[must_use]
    pub fn new(command: CommandSpec) -> Self {
        Self {
            command,
            working_dir: None,
        }
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl Publisher for CommandPublisher {
    fn publish(&self, verdict: &VersionVerdict) -> Result<PublishReport, ActionError> {
        if !verdict.changed {
            return Err(ActionError::Rejected {
                action: "publish".to_string(),
                reason: format!("version {} is already published", verdict.previous),
            });
        }
        let version = verdict.new_version.to_string();

        let args = self.command.render_args("version", &version);
        let output = run(&self.command, args, self.working_dir.as_ref())?;

        Ok(PublishReport {
            action: format!("ran '{}' for {version}", self.command.program()),
            output,
        })
    }
}

/// Labels by running a configured command; `{label}` in its arguments is
/// replaced with the prefixed label name.
pub struct CommandLabelSink {
    command: CommandSpec,
    prefix: String,
    working_dir: Option<PathBuf>,
}

impl CommandLabelSink {
    #[must_use]
    pub fn new(command: CommandSpec, prefix: impl Into<String>) -> Self {
        Self {
            command,
            prefix: prefix.into(),
            working_dir: None,
        }
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl LabelSink for CommandLabelSink {
    fn add_label(&self, label: CategoryLabel) -> Result<(), ActionError> {
        let name = format!("{}{}", self.prefix, label.as_str());
        let args = self.command.render_args("label", &name);
        run(&self.command, args, self.working_dir.as_ref())?;
        Ok(())
    }
}
