use std::path::Path;

use shipgate_operations::OperationError;
use shipgate_operations::concurrency::RunRegistry;
use shipgate_operations::operations::{ReleaseInput, ReleaseOperation, ReleaseOutcome};
use shipgate_operations::providers::CommandPublisher;
use tracing::{debug, info};

use super::ReleaseArgs;
use crate::environment;
use crate::error::Result;
use crate::output;

pub(crate) fn run(args: ReleaseArgs, start_path: &Path) -> Result<()> {
    let (root, config) = super::load_config(start_path)?;
    let (release, _, _) = config.into_parts();
    let mut release = args.version.apply(release, start_path);
    if let Some(line) = &args.publish_command {
        release = release.with_publish_command(super::parse_command(line, "publish-command")?);
    }

    let command = release
        .publish_command()
        .cloned()
        .ok_or(OperationError::MissingPublishCommand)?;
    let (source, fetcher) = super::version_providers(&release)?;

    if let Some(ci) = environment::detect_ci() {
        debug!(ci, "running under CI");
    }
    let key = environment::concurrency_key(args.concurrency_key.as_deref(), "release")?;
    let registry = RunRegistry::new();
    let run = registry.begin(key);
    info!(key = %run.key(), "release run registered");

    let operation = ReleaseOperation::new(
        source,
        fetcher,
        CommandPublisher::new(command).with_working_dir(root),
    );
    let input = ReleaseInput {
        dry_run: args.dry_run,
    };
    let outcome = operation.execute(&input, &run)?;

    print_outcome(&outcome);

    Ok(())
}

fn print_outcome(outcome: &ReleaseOutcome) {
    output::print_verdict(None, outcome.verdict());
    match outcome {
        ReleaseOutcome::Skipped(_) => output::print_field("published", false),
        ReleaseOutcome::DryRun(_) => {
            output::print_field("published", false);
            output::print_field("dry-run", true);
        }
        ReleaseOutcome::Published { report, .. } => {
            info!(action = %report.action, "publish finished");
            if let Some(text) = &report.output {
                debug!(output = %text, "publish output");
            }
            output::print_field("published", true);
        }
    }
}
