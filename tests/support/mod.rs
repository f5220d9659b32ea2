//! Scripted provider shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use trendx_core::{
    CollectorConfig, Keyword, RawGeo, RawSample, Reading, Region, RelatedTerms, SourceError,
    Timeframe, TrendsSource, UtcDateTime,
};

/// Provider whose answers are queued by the test.
///
/// Clones share state, so a test keeps one handle for assertions after
/// handing another to the collector.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    trending: Option<Result<Vec<String>, SourceError>>,
    series_failures: VecDeque<SourceError>,
    series_by_keyword: HashMap<String, Result<Vec<RawSample>, SourceError>>,
    default_series: Vec<u8>,
    related: Option<Result<RelatedTerms, SourceError>>,
    geo: Option<Result<Vec<RawGeo>, SourceError>>,
    calls: Vec<Call>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub argument: String,
    pub at: Instant,
}

impl ScriptedSource {
    pub fn new() -> Self {
        let source = Self::default();
        source.lock().default_series = vec![40, 45, 50, 55, 60, 65, 70, 75];
        source
    }

    pub fn with_trending(self, result: Result<Vec<&str>, SourceError>) -> Self {
        self.lock().trending =
            Some(result.map(|entries| entries.into_iter().map(str::to_owned).collect()));
        self
    }

    pub fn with_default_series(self, values: &[u8]) -> Self {
        self.lock().default_series = values.to_vec();
        self
    }

    pub fn with_series_for(self, keyword: &str, result: Result<Vec<RawSample>, SourceError>) -> Self {
        self.lock()
            .series_by_keyword
            .insert(keyword.to_owned(), result);
        self
    }

    /// Failures answered by the next interest-series calls, before the script
    /// falls back to its configured series.
    pub fn with_series_failures(self, failures: Vec<SourceError>) -> Self {
        self.lock().series_failures = failures.into();
        self
    }

    pub fn with_related(self, result: Result<RelatedTerms, SourceError>) -> Self {
        self.lock().related = Some(result);
        self
    }

    pub fn with_geo(self, result: Result<Vec<RawGeo>, SourceError>) -> Self {
        self.lock().geo = Some(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, method: &'static str, argument: &str) {
        self.lock().calls.push(Call {
            method,
            argument: argument.to_owned(),
            at: Instant::now(),
        });
    }
}

impl TrendsSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch_trending(&self, region: &Region) -> Result<Vec<String>, SourceError> {
        self.record("trending", region.as_str());
        self.lock().trending.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn fetch_interest_series(
        &self,
        keyword: &Keyword,
        _timeframe: &Timeframe,
    ) -> Result<Vec<RawSample>, SourceError> {
        self.record("series", keyword.as_str());
        let mut script = self.lock();
        if let Some(failure) = script.series_failures.pop_front() {
            return Err(failure);
        }
        if let Some(result) = script.series_by_keyword.get(keyword.as_str()) {
            return result.clone();
        }
        Ok(weekly_samples(&script.default_series))
    }

    fn fetch_related(
        &self,
        keyword: &Keyword,
        _timeframe: &Timeframe,
    ) -> Result<RelatedTerms, SourceError> {
        self.record("related", keyword.as_str());
        self.lock()
            .related
            .clone()
            .unwrap_or_else(|| Ok(RelatedTerms::default()))
    }

    fn fetch_geo(&self, keyword: &Keyword, _timeframe: &Timeframe) -> Result<Vec<RawGeo>, SourceError> {
        self.record("geo", keyword.as_str());
        self.lock().geo.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Complete weekly samples ending now, one per value.
pub fn weekly_samples(values: &[u8]) -> Vec<RawSample> {
    let now = UtcDateTime::now();
    let count = values.len() as u32;
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            RawSample::new(
                now.weeks_before(count - 1 - index as u32),
                Reading::Present(i64::from(*value)),
            )
        })
        .collect()
}

pub fn terms(top: &[&str], rising: &[&str]) -> RelatedTerms {
    RelatedTerms {
        topics: Vec::new(),
        top_queries: top.iter().map(|term| (*term).to_owned()).collect(),
        rising_queries: rising.iter().map(|term| (*term).to_owned()).collect(),
    }
}

/// Configuration without gate spacing or quota cooldown.
pub fn fast_config() -> CollectorConfig {
    CollectorConfig {
        min_interval: Duration::ZERO,
        quota_cooldown: Duration::ZERO,
        ..CollectorConfig::default()
    }
}
