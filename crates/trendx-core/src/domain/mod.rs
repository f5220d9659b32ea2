//! Validated data model for trend collection.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Keyword`] | Search keyword under the shared keyword rule |
//! | [`Region`] | Two-letter country code |
//! | [`TrendCategory`] | Provider topic category |
//! | [`Timeframe`] | Provider timeframe expression |
//! | [`InterestPoint`] | One normalized interest sample |
//! | [`TrendKeywordMetric`] | Derived metric for a trending keyword |
//! | [`KeywordDetail`] | Full breakdown for a single keyword |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Records are built fresh for every call and validated at construction.

mod category;
mod keyword;
mod models;
mod region;
mod timeframe;
mod timestamp;

pub use category::TrendCategory;
pub use keyword::{retain_valid_keywords, Keyword, MAX_KEYWORD_LEN};
pub use models::{
    validate_growth_rate, validate_search_volume, InterestPoint, KeywordDetail,
    TrendKeywordMetric, MAX_GROWTH_RATE, MAX_SEARCH_VOLUME, MIN_GROWTH_RATE,
};
pub use region::Region;
pub use timeframe::Timeframe;
pub use timestamp::UtcDateTime;
