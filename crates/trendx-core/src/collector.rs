use std::fmt::{Display, Formatter};
use std::thread;

use serde::Serialize;

use crate::classify::{FailureClass, FailurePolicy};
use crate::config::CollectorConfig;
use crate::derive::{complete_samples, dedupe_related, HeuristicModel, MetricModel};
use crate::source::{
    normalize_geo, normalize_series, RelatedTerms, SourceError, SourceFactory, TrendsSource,
};
use crate::throttling::AccessGate;
use crate::{
    CollectError, Keyword, KeywordDetail, Region, Timeframe, TrendCategory, TrendKeywordMetric,
    UtcDateTime, ValidationError,
};

const TRENDING: &str = "get_trending_keywords";
const DETAILS: &str = "get_keyword_details";
const RELATED: &str = "get_related_keywords";

/// Step of an operation at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Caller input rejected before any provider call.
    Idle,
    /// Provider call (including client construction) failed.
    Fetching,
    /// Derived record failed validation.
    Deriving,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Deriving => "deriving",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Most recent failure seen by a collector, swallowed or not.
///
/// Batch operations answer an empty list both when the provider had nothing
/// and when a call failed; this record tells the two apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub operation: &'static str,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<FailureClass>,
    pub code: &'static str,
    pub message: String,
    pub at: UtcDateTime,
}

/// What a failed call does with a quota signal before it gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuotaHandling {
    /// Wait out the policy cooldown, then propagate.
    Cooldown,
    /// Record and move on; the caller substitutes an empty answer.
    Skip,
}

/// Sequences gate, provider call, failure classification and derivation for
/// the three collection operations.
///
/// One collector drives one serial call stream; operations take `&mut self`
/// and run to completion, blocking waits included, before the next starts.
/// The provider client handle is built on first use and kept for the
/// collector's lifetime.
pub struct TrendsCollector {
    config: CollectorConfig,
    gate: AccessGate,
    policy: FailurePolicy,
    model: Box<dyn MetricModel>,
    factory: Option<Box<dyn SourceFactory>>,
    client: Option<Box<dyn TrendsSource>>,
    last_failure: Option<FailureRecord>,
}

impl TrendsCollector {
    /// Collector that connects through `factory` on the first provider call.
    pub fn new(config: CollectorConfig, factory: impl SourceFactory + 'static) -> Self {
        Self::assemble(config, Some(Box::new(factory)), None)
    }

    /// Collector around an already-built provider client.
    pub fn with_source(config: CollectorConfig, source: impl TrendsSource + 'static) -> Self {
        Self::assemble(config, None, Some(Box::new(source)))
    }

    fn assemble(
        config: CollectorConfig,
        factory: Option<Box<dyn SourceFactory>>,
        client: Option<Box<dyn TrendsSource>>,
    ) -> Self {
        tracing::info!(
            language = %config.client.language,
            tz_offset_minutes = config.client.tz_offset_minutes,
            timeout_ms = config.client.timeout.as_millis() as u64,
            min_interval_ms = config.min_interval.as_millis() as u64,
            "trends collector initialized"
        );

        Self {
            gate: AccessGate::new(config.min_interval),
            policy: config.failure_policy(),
            model: Box::new(HeuristicModel::default()),
            factory,
            client,
            last_failure: None,
            config,
        }
    }

    /// Replaces the growth/volume model.
    pub fn with_model(mut self, model: impl MetricModel + 'static) -> Self {
        self.model = Box::new(model);
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn last_failure(&self) -> Option<&FailureRecord> {
        self.last_failure.as_ref()
    }

    pub fn clear_last_failure(&mut self) {
        self.last_failure = None;
    }

    /// Current trending keywords for `region` with derived metrics.
    ///
    /// Never fails: invalid input or a failed trending-list call yields an
    /// empty list. Entries are capped to the first `trending_limit` raw
    /// entries and an entry that fails validation is skipped. When an entry's
    /// own series or related-terms call fails, the entry is still reported
    /// with an empty series (growth 0.0, volume 0) or no related terms; the
    /// failure is recorded without a quota cooldown and the batch continues.
    pub fn get_trending_keywords(
        &mut self,
        region: &str,
        timeframe: &str,
    ) -> Vec<TrendKeywordMetric> {
        tracing::info!(region, timeframe, "collecting trending keywords");

        let parsed = Region::parse(region).and_then(|region| {
            Timeframe::parse(timeframe).map(|timeframe| (region, timeframe))
        });
        let (region, timeframe) = match parsed {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::warn!(error = %error, "rejected trending request");
                self.record_invalid(TRENDING, Phase::Idle, &error);
                return Vec::new();
            }
        };

        let Ok(entries) = self.call_source(TRENDING, |source| source.fetch_trending(&region))
        else {
            return Vec::new();
        };
        if entries.is_empty() {
            tracing::warn!(region = %region, "no trending searches reported");
            return Vec::new();
        }

        let observed_at = UtcDateTime::now();
        let mut metrics = Vec::new();
        for entry in entries.iter().take(self.config.trending_limit) {
            let text = entry.trim();
            if text.is_empty() {
                continue;
            }

            match self.trending_metric(text, &region, &timeframe, observed_at) {
                Ok(metric) => {
                    tracing::debug!(keyword = text, "added trending keyword");
                    metrics.push(metric);
                }
                Err(error) => {
                    tracing::warn!(keyword = text, error = %error, "skipping trending keyword");
                    self.record_invalid(TRENDING, Phase::Deriving, &error);
                }
            }
        }

        tracing::info!(count = metrics.len(), "retrieved trending keywords");
        metrics
    }

    /// Interest series, related terms and regional breakdown for `keyword`.
    ///
    /// Any provider failure reaches the caller as the same [`SourceError`]
    /// the provider raised, after classification.
    pub fn get_keyword_details(&mut self, keyword: &str) -> Result<KeywordDetail, CollectError> {
        tracing::info!(keyword, "collecting keyword details");

        let keyword = Keyword::parse(keyword).inspect_err(|error| {
            self.record_invalid(DETAILS, Phase::Idle, error);
        })?;
        let timeframe = Timeframe::past_year();

        let series = self.call_source(DETAILS, |source| {
            source
                .fetch_interest_series(&keyword, &timeframe)
                .and_then(|raw| normalize_series(&raw))
        })?;
        let related = self.call_source(DETAILS, |source| {
            source.fetch_related(&keyword, &timeframe)
        })?;
        let geo_limit = self.config.geo_limit;
        let geo_distribution = self.call_source(DETAILS, |source| {
            source
                .fetch_geo(&keyword, &timeframe)
                .and_then(|raw| normalize_geo(raw, geo_limit))
        })?;

        let list_limit = self.config.detail_list_limit;
        let estimated_search_volume = self.model.estimate_volume(&series);
        let detail = KeywordDetail::new(
            keyword,
            estimated_search_volume,
            series,
            related.topics.into_iter().take(list_limit).collect(),
            related.top_queries.into_iter().take(list_limit).collect(),
            geo_distribution,
            UtcDateTime::now(),
        )
        .inspect_err(|error| self.record_invalid(DETAILS, Phase::Deriving, error))?;

        tracing::info!(keyword = %detail.keyword, "retrieved keyword details");
        Ok(detail)
    }

    /// Related queries for `keyword`, capped at the configured `related_limit`.
    pub fn get_related_keywords(&mut self, keyword: &str) -> Vec<String> {
        let limit = self.config.related_limit;
        self.get_related_keywords_limited(keyword, limit)
    }

    /// Top queries followed by rising queries, deduplicated, without the
    /// keyword itself, capped at `limit`. Never fails: any failure yields an
    /// empty list.
    pub fn get_related_keywords_limited(&mut self, keyword: &str, limit: usize) -> Vec<String> {
        tracing::info!(keyword, limit, "collecting related keywords");

        let keyword = match Keyword::parse(keyword) {
            Ok(keyword) => keyword,
            Err(error) => {
                tracing::warn!(error = %error, "rejected related keywords request");
                self.record_invalid(RELATED, Phase::Idle, &error);
                return Vec::new();
            }
        };

        let timeframe = Timeframe::past_year();
        let Ok(terms) = self.call_source(RELATED, |source| {
            source.fetch_related(&keyword, &timeframe)
        }) else {
            return Vec::new();
        };

        let related = dedupe_related(
            terms.top_queries.into_iter().take(self.config.top_queries_taken),
            terms
                .rising_queries
                .into_iter()
                .take(self.config.rising_queries_taken),
            keyword.as_str(),
            limit,
        );

        tracing::info!(keyword = %keyword, count = related.len(), "found related keywords");
        related
    }

    fn trending_metric(
        &mut self,
        text: &str,
        region: &Region,
        timeframe: &Timeframe,
        observed_at: UtcDateTime,
    ) -> Result<TrendKeywordMetric, ValidationError> {
        let keyword = Keyword::parse(text)?;

        let series = self
            .call_source_with(TRENDING, QuotaHandling::Skip, |source| {
                source
                    .fetch_interest_series(&keyword, timeframe)
                    .and_then(|raw| normalize_series(&raw))
            })
            .unwrap_or_else(|error| {
                tracing::warn!(keyword = %keyword, error = %error, "using empty interest series");
                Vec::new()
            });
        let growth = self
            .model
            .growth_rate(complete_samples(&series, self.config.keep_partial_samples));
        let volume = self.model.estimate_volume(&series);

        let related = if self.config.enrich_related {
            let related_timeframe = Timeframe::past_year();
            let terms = self
                .call_source_with(TRENDING, QuotaHandling::Skip, |source| {
                    source.fetch_related(&keyword, &related_timeframe)
                })
                .unwrap_or_else(|error| {
                    tracing::warn!(keyword = %keyword, error = %error, "skipping related enrichment");
                    RelatedTerms::default()
                });
            dedupe_related(
                terms.top_queries.into_iter().take(self.config.top_queries_taken),
                terms
                    .rising_queries
                    .into_iter()
                    .take(self.config.rising_queries_taken),
                keyword.as_str(),
                self.config.enrichment_limit,
            )
        } else {
            Vec::new()
        };

        let metric = TrendKeywordMetric::new(
            keyword,
            volume,
            growth,
            region.clone(),
            TrendCategory::All,
            observed_at,
            related,
        )?;
        Ok(metric)
    }

    fn call_source<T, F>(&mut self, operation: &'static str, call: F) -> Result<T, SourceError>
    where
        F: Fn(&dyn TrendsSource) -> Result<T, SourceError>,
    {
        self.call_source_with(operation, QuotaHandling::Cooldown, call)
    }

    /// Gate, call, classify. Transient failures are re-issued while the retry
    /// budget lasts; every attempt passes the gate again.
    fn call_source_with<T, F>(
        &mut self,
        operation: &'static str,
        quota: QuotaHandling,
        call: F,
    ) -> Result<T, SourceError>
    where
        F: Fn(&dyn TrendsSource) -> Result<T, SourceError>,
    {
        let mut attempt = 0;
        loop {
            self.gate.acquire();
            let outcome = match self.connected_client() {
                Ok(client) => call(client),
                Err(error) => Err(error),
            };

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let (class, error) = match quota {
                QuotaHandling::Cooldown => self.policy.settle(error, operation),
                QuotaHandling::Skip => (self.policy.observe(&error, operation), error),
            };
            if class == FailureClass::Transient {
                if let Some(delay) = self.config.transient_retry.delay_for(attempt) {
                    tracing::debug!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "retrying transient provider failure"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                    continue;
                }
            }

            self.last_failure = Some(FailureRecord {
                operation,
                phase: Phase::Fetching,
                class: Some(class),
                code: error.code(),
                message: error.message().to_owned(),
                at: UtcDateTime::now(),
            });
            return Err(error);
        }
    }

    fn connected_client(&mut self) -> Result<&dyn TrendsSource, SourceError> {
        if self.client.is_none() {
            let factory = self
                .factory
                .as_ref()
                .ok_or_else(|| SourceError::internal("no provider client or factory configured"))?;
            let client = factory.connect(&self.config.client).inspect_err(|error| {
                tracing::error!(error = %error, "failed to create provider client");
            })?;
            tracing::debug!(source = client.name(), "created provider client");
            self.client = Some(client);
        }

        self.client
            .as_deref()
            .ok_or_else(|| SourceError::internal("provider client unavailable"))
    }

    fn record_invalid(&mut self, operation: &'static str, phase: Phase, error: &ValidationError) {
        self.last_failure = Some(FailureRecord {
            operation,
            phase,
            class: None,
            code: "collect.validation",
            message: error.to_string(),
            at: UtcDateTime::now(),
        });
    }
}
