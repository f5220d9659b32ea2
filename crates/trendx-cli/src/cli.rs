//! CLI argument definitions for trendx.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `trending` | Trending keywords for a region with growth and volume |
//! | `details` | Interest series, related terms and regions for one keyword |
//! | `related` | Related queries for one keyword |
//!
//! Output is always a JSON envelope on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "trendx",
    version,
    about = "Rate-gated keyword search-trend collection"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// TOML configuration file; `TRENDX_*` variables still override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum spacing between provider calls in milliseconds.
    #[arg(long, global = true)]
    pub min_interval_ms: Option<u64>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Trending keywords for a region.
    ///
    ///   trendx trending
    ///   trendx trending --region gb --timeframe "now 7-d" --enrich
    Trending(TrendingArgs),

    /// Details for a single keyword over the past year.
    ///
    ///   trendx details "heat pump" --pretty
    Details(DetailsArgs),

    /// Related queries for a keyword.
    ///
    ///   trendx related "solar eclipse" --limit 5
    Related(RelatedArgs),
}

#[derive(Debug, Args)]
pub struct TrendingArgs {
    /// Two-letter region code.
    #[arg(long, default_value = "US")]
    pub region: String,

    /// Provider timeframe expression.
    #[arg(long, default_value = "today")]
    pub timeframe: String,

    /// Attach related keywords to each trending entry.
    #[arg(long, default_value_t = false)]
    pub enrich: bool,
}

#[derive(Debug, Args)]
pub struct DetailsArgs {
    pub keyword: String,
}

#[derive(Debug, Args)]
pub struct RelatedArgs {
    pub keyword: String,

    /// Maximum number of related keywords; defaults to the configured limit.
    #[arg(long)]
    pub limit: Option<usize>,
}
