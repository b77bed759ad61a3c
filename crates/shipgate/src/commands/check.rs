use std::path::Path;

use shipgate_operations::operations::CheckOperation;

use super::CheckArgs;
use crate::error::Result;
use crate::output;

pub(crate) fn run(args: CheckArgs, start_path: &Path) -> Result<()> {
    let (_, config) = super::load_config(start_path)?;
    let (release, _, _) = config.into_parts();
    let release = args.version.apply(release, start_path);

    let (source, fetcher) = super::version_providers(&release)?;
    let output = CheckOperation::new(source, fetcher).execute()?;

    output::print_verdict(Some(&output.local), &output.verdict);

    Ok(())
}
