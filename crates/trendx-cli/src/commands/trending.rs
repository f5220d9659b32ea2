use serde::Serialize;
use trendx_core::{TrendKeywordMetric, TrendsCollector};

use crate::cli::TrendingArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct TrendingResponseData {
    region: String,
    timeframe: String,
    keywords: Vec<TrendKeywordMetric>,
}

pub fn run(args: &TrendingArgs, collector: &mut TrendsCollector) -> Result<CommandResult, CliError> {
    let keywords = collector.get_trending_keywords(&args.region, &args.timeframe);

    let data = serde_json::to_value(TrendingResponseData {
        region: args.region.trim().to_ascii_uppercase(),
        timeframe: args.timeframe.trim().to_owned(),
        keywords,
    })?;

    CommandResult::ok(data).with_swallowed_failure(collector)
}
