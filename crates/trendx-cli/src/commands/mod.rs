mod details;
mod related;
mod trending;

use std::time::{Duration, Instant};

use serde_json::Value;
use trendx_core::{
    CollectorConfig, Envelope, EnvelopeError, EnvelopeMeta, FixtureSource, TrendsCollector,
};
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    /// Surfaces a failure the collector swallowed, so an empty list that
    /// came from a failed call is distinguishable from a genuinely empty one.
    pub fn with_swallowed_failure(self, collector: &TrendsCollector) -> Result<Self, CliError> {
        let Some(record) = collector.last_failure() else {
            return Ok(self);
        };

        let warning = format!(
            "{} degraded during {}: {}",
            record.operation, record.phase, record.message
        );
        let error = EnvelopeError::from_failure(record)?;
        Ok(self.with_warning(warning).with_error(error))
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let mut config = CollectorConfig::load(cli.config.as_deref())?;
    if let Some(ms) = cli.min_interval_ms {
        config.min_interval = Duration::from_millis(ms);
    }
    if let Command::Trending(args) = &cli.command {
        config.enrich_related |= args.enrich;
    }
    config.validate()?;

    let source = FixtureSource::default();
    let source_name = trendx_core::TrendsSource::name(&source).to_owned();
    let mut collector = TrendsCollector::with_source(config, source);

    let started = Instant::now();
    let command_result = match &cli.command {
        Command::Trending(args) => trending::run(args, &mut collector)?,
        Command::Details(args) => details::run(args, &mut collector)?,
        Command::Related(args) => related::run(args, &mut collector)?,
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::debug!(
        source = %source_name,
        latency_ms,
        warnings = command_result.warnings.len(),
        "command finished"
    );

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), source_name, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}
