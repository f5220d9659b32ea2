use serde::Serialize;
use trendx_core::TrendsCollector;

use crate::cli::RelatedArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct RelatedResponseData {
    keyword: String,
    related: Vec<String>,
}

pub fn run(args: &RelatedArgs, collector: &mut TrendsCollector) -> Result<CommandResult, CliError> {
    let related = match args.limit {
        Some(limit) => collector.get_related_keywords_limited(&args.keyword, limit),
        None => collector.get_related_keywords(&args.keyword),
    };

    let data = serde_json::to_value(RelatedResponseData {
        keyword: args.keyword.trim().to_owned(),
        related,
    })?;

    CommandResult::ok(data).with_swallowed_failure(collector)
}
