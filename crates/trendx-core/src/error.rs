use thiserror::Error;

use crate::source::SourceError;

/// Validation and contract errors exposed by `trendx-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("keyword cannot be empty")]
    EmptyKeyword,
    #[error("keyword length {len} exceeds max {max}")]
    KeywordTooLong { len: usize, max: usize },
    #[error("keyword contains invalid character '{ch}' at index {index}")]
    KeywordInvalidChar { ch: char, index: usize },

    #[error("region must be a 2-letter country code: '{value}'")]
    InvalidRegion { value: String },
    #[error(
        "invalid category '{value}', expected one of all, business, entertainment, health, \
         science_tech, sports, top_stories"
    )]
    InvalidCategory { value: String },
    #[error("invalid timeframe '{value}'")]
    InvalidTimeframe { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("estimated search volume {value} exceeds max {max}")]
    VolumeOutOfRange { value: u64, max: u64 },
    #[error("growth rate {value} is outside [{min}, {max}]")]
    GrowthRateOutOfRange { value: f64, min: f64, max: f64 },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Error surfaced by single-record collection operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollectError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CollectError {
    /// Stable machine-readable code for envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Source(error) => error.code(),
            Self::Validation(_) => "collect.validation",
        }
    }

    pub fn source_error(&self) -> Option<&SourceError> {
        match self {
            Self::Source(error) => Some(error),
            Self::Validation(_) => None,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
