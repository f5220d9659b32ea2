//! Core contracts for trendx.
//!
//! This crate contains:
//! - Keyword, region and timeframe models with validation
//! - The trend-provider boundary and a deterministic fixture provider
//! - Access gating, failure classification and transient retry
//! - Growth and volume derivation
//! - The collector sequencing all of the above
//! - Layered configuration and the response envelope

pub mod adapters;
pub mod classify;
pub mod collector;
pub mod config;
pub mod derive;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod retry;
pub mod source;
pub mod throttling;

pub use adapters::FixtureSource;
pub use classify::{classify, FailureClass, FailurePolicy};
pub use collector::{FailureRecord, Phase, TrendsCollector};
pub use config::CollectorConfig;
pub use derive::{HeuristicModel, MetricModel};
pub use domain::{
    InterestPoint, Keyword, KeywordDetail, Region, Timeframe, TrendCategory, TrendKeywordMetric,
    UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{CollectError, ConfigError, ValidationError};
pub use retry::{Backoff, TransientRetry};
pub use source::{
    ClientSettings, RawGeo, RawSample, Reading, RelatedTerms, SourceError, SourceErrorKind,
    SourceFactory, TrendsSource,
};
pub use throttling::AccessGate;
