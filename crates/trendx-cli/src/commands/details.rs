use trendx_core::TrendsCollector;

use crate::cli::DetailsArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &DetailsArgs, collector: &mut TrendsCollector) -> Result<CommandResult, CliError> {
    let detail = collector.get_keyword_details(&args.keyword)?;
    let data = serde_json::to_value(detail)?;
    Ok(CommandResult::ok(data))
}
