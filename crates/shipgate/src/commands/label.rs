use std::io::Write;
use std::path::Path;

use shipgate_core::CategoryLabel;
use shipgate_operations::ActionError;
use shipgate_operations::operations::{LabelOperation, LabelOutcome, LabelReport, TitleClassifier};
use shipgate_operations::providers::CommandLabelSink;
use shipgate_operations::traits::LabelSink;

use super::LabelArgs;
use crate::error::Result;
use crate::output;

/// Writes the label to stdout for a later workflow step to apply.
struct PrintLabelSink {
    prefix: String,
}

impl LabelSink for PrintLabelSink {
    fn add_label(&self, label: CategoryLabel) -> std::result::Result<(), ActionError> {
        writeln!(std::io::stdout().lock(), "add-label={}{label}", self.prefix).map_err(|e| {
            ActionError::Rejected {
                action: format!("print label '{label}'"),
                reason: e.to_string(),
            }
        })
    }
}

pub(crate) fn run(args: LabelArgs, start_path: &Path) -> Result<()> {
    let (root, config) = super::load_config(start_path)?;
    let (_, policy, mut label_config) = config.into_parts();
    if let Some(line) = &args.label_command {
        label_config = label_config.with_command(super::parse_command(line, "label-command")?);
    }
    if let Some(prefix) = args.label_prefix {
        label_config = label_config.with_label_prefix(prefix);
    }

    let classifier = TitleClassifier::new(policy);
    let title = args.title.title;
    let prefix = label_config.label_prefix().to_string();

    let report = match label_config.command() {
        Some(command) => {
            let sink =
                CommandLabelSink::new(command.clone(), prefix.as_str()).with_working_dir(root);
            LabelOperation::new(classifier, sink).execute(&title)?
        }
        None => {
            let sink = PrintLabelSink {
                prefix: prefix.clone(),
            };
            LabelOperation::new(classifier, sink).execute(&title)?
        }
    };

    print_report(&report, &prefix);

    Ok(())
}

fn print_report(report: &LabelReport, prefix: &str) {
    output::print_title(&report.classification.title);
    match report.outcome {
        LabelOutcome::Applied(label) => {
            output::print_field("label", format!("{prefix}{label}"));
            output::print_field("applied", true);
        }
        LabelOutcome::Unlabeled => {
            output::print_field("label", CategoryLabel::None);
            output::print_field("applied", false);
        }
    }
}
