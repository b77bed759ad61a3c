use std::path::Path;

use shipgate_operations::operations::TitleClassifier;

use super::TitleArgs;
use crate::error::Result;
use crate::output;

pub(crate) fn run(args: TitleArgs, start_path: &Path) -> Result<()> {
    let (_, config) = super::load_config(start_path)?;
    let (_, policy, _) = config.into_parts();

    let classification = TitleClassifier::new(policy).classify(&args.title)?;

    output::print_title(&classification.title);
    output::print_field("label", classification.label);

    Ok(())
}
