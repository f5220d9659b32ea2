use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Keyword, Region, TrendCategory, UtcDateTime, ValidationError};

pub const MAX_SEARCH_VOLUME: u64 = 1_000_000_000;
pub const MIN_GROWTH_RATE: f64 = -100.0;
pub const MAX_GROWTH_RATE: f64 = 10_000.0;

/// One normalized interest sample.
///
/// `value` is the provider's relative score in `0..=100`; missing readings are
/// normalized to zero before a point is built. `partial` marks the provider's
/// still-accumulating trailing sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPoint {
    pub at: UtcDateTime,
    pub value: u8,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

impl InterestPoint {
    pub fn new(at: UtcDateTime, value: u8) -> Self {
        Self {
            at,
            value,
            partial: false,
        }
    }

    pub fn partial(at: UtcDateTime, value: u8) -> Self {
        Self {
            at,
            value,
            partial: true,
        }
    }
}

/// Derived metric for one trending keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendKeywordMetric {
    pub keyword: Keyword,
    pub estimated_search_volume: u64,
    pub growth_rate_percent: f64,
    pub region: Region,
    pub category: TrendCategory,
    pub observed_at: UtcDateTime,
    pub related_keywords: Vec<Keyword>,
}

impl TrendKeywordMetric {
    /// Validates the numeric fields. Related keywords that fail the keyword
    /// rule are dropped rather than rejected; duplicates keep their first slot.
    pub fn new<I, S>(
        keyword: Keyword,
        estimated_search_volume: u64,
        growth_rate_percent: f64,
        region: Region,
        category: TrendCategory,
        observed_at: UtcDateTime,
        related_keywords: I,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_search_volume(estimated_search_volume)?;
        validate_growth_rate(growth_rate_percent)?;

        let mut seen = HashSet::new();
        let related_keywords = crate::domain::retain_valid_keywords(related_keywords)
            .into_iter()
            .filter(|related| seen.insert(related.clone()))
            .collect();

        Ok(Self {
            keyword,
            estimated_search_volume,
            growth_rate_percent,
            region,
            category,
            observed_at,
            related_keywords,
        })
    }
}

/// Full interest breakdown for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDetail {
    pub keyword: Keyword,
    pub estimated_search_volume: u64,
    pub interest_series: Vec<InterestPoint>,
    pub related_topics: Vec<String>,
    pub related_queries: Vec<String>,
    pub geo_distribution: BTreeMap<String, u32>,
    pub observed_at: UtcDateTime,
}

impl KeywordDetail {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        keyword: Keyword,
        estimated_search_volume: u64,
        interest_series: Vec<InterestPoint>,
        related_topics: Vec<String>,
        related_queries: Vec<String>,
        geo_distribution: BTreeMap<String, u32>,
        observed_at: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        validate_search_volume(estimated_search_volume)?;

        Ok(Self {
            keyword,
            estimated_search_volume,
            interest_series,
            related_topics,
            related_queries,
            geo_distribution,
            observed_at,
        })
    }
}

pub fn validate_search_volume(value: u64) -> Result<u64, ValidationError> {
    if value > MAX_SEARCH_VOLUME {
        return Err(ValidationError::VolumeOutOfRange {
            value,
            max: MAX_SEARCH_VOLUME,
        });
    }
    Ok(value)
}

pub fn validate_growth_rate(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || !(MIN_GROWTH_RATE..=MAX_GROWTH_RATE).contains(&value) {
        return Err(ValidationError::GrowthRateOutOfRange {
            value,
            min: MIN_GROWTH_RATE,
            max: MAX_GROWTH_RATE,
        });
    }
    Ok(value)
}
