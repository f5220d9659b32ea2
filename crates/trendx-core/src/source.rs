use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{InterestPoint, Keyword, Region, Timeframe, UtcDateTime};

/// Provider reading that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Reading {
    Present(i64),
    Missing,
}

impl Reading {
    /// Missing readings count as zero interest.
    pub const fn or_zero(self) -> i64 {
        match self {
            Self::Present(value) => value,
            Self::Missing => 0,
        }
    }
}

impl From<Option<i64>> for Reading {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Missing, Self::Present)
    }
}

/// Raw interest-over-time sample as handed over by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub at: UtcDateTime,
    pub reading: Reading,
    pub partial: bool,
}

impl RawSample {
    pub const fn new(at: UtcDateTime, reading: Reading) -> Self {
        Self {
            at,
            reading,
            partial: false,
        }
    }

    pub const fn partial(at: UtcDateTime, reading: Reading) -> Self {
        Self {
            at,
            reading,
            partial: true,
        }
    }
}

/// Related topics and queries for a keyword, in provider rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedTerms {
    pub topics: Vec<String>,
    pub top_queries: Vec<String>,
    pub rising_queries: Vec<String>,
}

/// Raw interest-by-region entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGeo {
    pub region: String,
    pub reading: Reading,
}

impl RawGeo {
    pub fn new(region: impl Into<String>, reading: Reading) -> Self {
        Self {
            region: region.into(),
            reading,
        }
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    RateLimited,
    Unavailable,
    Timeout,
    MalformedResponse,
    InvalidRequest,
    Internal,
}

/// Structured provider error passed through the collector unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Timeout, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::MalformedResponse, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Trend-data provider contract.
///
/// Calls block until the provider answers. Empty results are valid answers,
/// not errors.
pub trait TrendsSource: Send {
    fn name(&self) -> &str;
    fn fetch_trending(&self, region: &Region) -> Result<Vec<String>, SourceError>;
    fn fetch_interest_series(
        &self,
        keyword: &Keyword,
        timeframe: &Timeframe,
    ) -> Result<Vec<RawSample>, SourceError>;
    fn fetch_related(
        &self,
        keyword: &Keyword,
        timeframe: &Timeframe,
    ) -> Result<RelatedTerms, SourceError>;
    fn fetch_geo(&self, keyword: &Keyword, timeframe: &Timeframe)
        -> Result<Vec<RawGeo>, SourceError>;
}

/// Settings handed to a [`SourceFactory`] when the client handle is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub language: String,
    pub tz_offset_minutes: i32,
    pub timeout: Duration,
    pub retries: u32,
    pub backoff_factor: f64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            tz_offset_minutes: 360,
            timeout: Duration::from_secs(10),
            retries: 2,
            backoff_factor: 0.1,
        }
    }
}

/// Builds the provider client handle on first use.
pub trait SourceFactory: Send {
    fn connect(&self, settings: &ClientSettings) -> Result<Box<dyn TrendsSource>, SourceError>;
}

impl<F> SourceFactory for F
where
    F: Fn(&ClientSettings) -> Result<Box<dyn TrendsSource>, SourceError> + Send,
{
    fn connect(&self, settings: &ClientSettings) -> Result<Box<dyn TrendsSource>, SourceError> {
        self(settings)
    }
}

/// Turns raw samples into interest points.
///
/// Missing readings become zero; a present reading outside `0..=100` means the
/// provider sent something this crate cannot interpret.
pub fn normalize_series(raw: &[RawSample]) -> Result<Vec<InterestPoint>, SourceError> {
    raw.iter()
        .map(|sample| {
            let value = sample.reading.or_zero();
            let value = u8::try_from(value)
                .ok()
                .filter(|value| *value <= 100)
                .ok_or_else(|| {
                    SourceError::malformed(format!(
                        "interest value {value} at {} is outside 0..=100",
                        sample.at
                    ))
                })?;

            Ok(InterestPoint {
                at: sample.at,
                value,
                partial: sample.partial,
            })
        })
        .collect()
}

/// Keeps the `limit` regions with the highest positive intensity.
///
/// Ordering is intensity descending, then region name; a region listed twice
/// keeps its highest reading. Negative readings are malformed.
pub fn normalize_geo(raw: Vec<RawGeo>, limit: usize) -> Result<BTreeMap<String, u32>, SourceError> {
    let mut entries = Vec::with_capacity(raw.len());
    for entry in raw {
        let value = entry.reading.or_zero();
        let intensity = u32::try_from(value).map_err(|_| {
            SourceError::malformed(format!(
                "regional interest {value} for {} is negative or too large",
                entry.region
            ))
        })?;
        if intensity > 0 {
            entries.push((entry.region, intensity));
        }
    }

    entries.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));

    let mut top = BTreeMap::new();
    for (region, intensity) in entries {
        if top.len() == limit {
            break;
        }
        top.entry(region).or_insert(intensity);
    }
    Ok(top)
}
