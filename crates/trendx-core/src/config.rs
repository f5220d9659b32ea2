//! Collector configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `TRENDX_*` environment variables. Durations are written in milliseconds.
//!
//! ```toml
//! min_interval_ms = 1000
//! quota_cooldown_ms = 60000
//! enrich_related = false
//!
//! [client]
//! language = "en-US"
//! tz_offset_minutes = 360
//! timeout_ms = 10000
//!
//! [retry]
//! transient_retries = 2
//! backoff_base_ms = 500
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::classify::FailurePolicy;
use crate::error::ConfigError;
use crate::retry::{Backoff, TransientRetry};
use crate::source::ClientSettings;

/// Runtime knobs for [`crate::TrendsCollector`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    pub client: ClientSettings,
    pub min_interval: Duration,
    pub quota_cooldown: Duration,
    pub transient_retry: TransientRetry,
    /// Raw trending entries processed per call.
    pub trending_limit: usize,
    /// Default cap for `get_related_keywords`.
    pub related_limit: usize,
    /// Related-keyword cap when enriching trending metrics.
    pub enrichment_limit: usize,
    pub top_queries_taken: usize,
    pub rising_queries_taken: usize,
    /// Topics and queries kept on a keyword detail.
    pub detail_list_limit: usize,
    pub geo_limit: usize,
    pub enrich_related: bool,
    pub keep_partial_samples: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            min_interval: Duration::from_secs(1),
            quota_cooldown: FailurePolicy::DEFAULT_QUOTA_COOLDOWN,
            transient_retry: TransientRetry::none(),
            trending_limit: 20,
            related_limit: 20,
            enrichment_limit: crate::derive::TRENDING_RELATED_CAP,
            top_queries_taken: 15,
            rising_queries_taken: 10,
            detail_list_limit: 10,
            geo_limit: 10,
            enrich_related: false,
            keep_partial_samples: false,
        }
    }
}

impl CollectorConfig {
    /// Defaults overlaid with the file at `path` (when given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            config.apply_toml(&raw)?;
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_toml(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_toml(&mut self, raw: &str) -> Result<(), ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.merge_into(self);
        Ok(())
    }

    /// Applies `TRENDX_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = parse_env::<u64, _>(&lookup, "TRENDX_MIN_INTERVAL_MS")? {
            self.min_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env::<u64, _>(&lookup, "TRENDX_QUOTA_COOLDOWN_MS")? {
            self.quota_cooldown = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env::<u64, _>(&lookup, "TRENDX_TIMEOUT_MS")? {
            self.client.timeout = Duration::from_millis(ms);
        }
        if let Some(language) = lookup("TRENDX_LANGUAGE") {
            self.client.language = language;
        }
        if let Some(offset) = parse_env::<i32, _>(&lookup, "TRENDX_TZ_OFFSET")? {
            self.client.tz_offset_minutes = offset;
        }
        if let Some(retries) = parse_env::<u32, _>(&lookup, "TRENDX_TRANSIENT_RETRIES")? {
            self.transient_retry.max_retries = retries;
        }
        if let Some(enrich) = parse_env::<bool, _>(&lookup, "TRENDX_ENRICH_RELATED")? {
            self.enrich_related = enrich;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("trending_limit", self.trending_limit),
            ("related_limit", self.related_limit),
            ("enrichment_limit", self.enrichment_limit),
            ("detail_list_limit", self.detail_list_limit),
            ("geo_limit", self.geo_limit),
        ];
        if let Some((field, _)) = limits.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::InvalidValue {
                field,
                reason: String::from("must be greater than zero"),
            });
        }

        if self.client.language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "client.language",
                reason: String::from("must not be empty"),
            });
        }

        let backoff_factor = self.client.backoff_factor;
        if !backoff_factor.is_finite() || backoff_factor < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "client.backoff_factor",
                reason: format!("must be a non-negative number, got {backoff_factor}"),
            });
        }

        if let Backoff::Exponential { factor, .. } = self.transient_retry.backoff {
            if !factor.is_finite() || factor < 1.0 {
                return Err(ConfigError::InvalidValue {
                    field: "retry.backoff_factor",
                    reason: format!("must be at least 1.0, got {factor}"),
                });
            }
        }

        Ok(())
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::new(self.quota_cooldown)
    }
}

fn parse_env<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|error| ConfigError::InvalidValue {
            field: key,
            reason: format!("'{raw}': {error}"),
        })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    min_interval_ms: Option<u64>,
    quota_cooldown_ms: Option<u64>,
    trending_limit: Option<usize>,
    related_limit: Option<usize>,
    enrichment_limit: Option<usize>,
    top_queries_taken: Option<usize>,
    rising_queries_taken: Option<usize>,
    detail_list_limit: Option<usize>,
    geo_limit: Option<usize>,
    enrich_related: Option<bool>,
    keep_partial_samples: Option<bool>,
    #[serde(default)]
    client: ClientFile,
    #[serde(default)]
    retry: RetryFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientFile {
    language: Option<String>,
    tz_offset_minutes: Option<i32>,
    timeout_ms: Option<u64>,
    retries: Option<u32>,
    backoff_factor: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RetryFile {
    transient_retries: Option<u32>,
    backoff_base_ms: Option<u64>,
    backoff_factor: Option<f64>,
    backoff_max_ms: Option<u64>,
    jitter: Option<bool>,
}

impl ConfigFile {
    fn merge_into(self, config: &mut CollectorConfig) {
        let millis = Duration::from_millis;

        if let Some(ms) = self.min_interval_ms {
            config.min_interval = millis(ms);
        }
        if let Some(ms) = self.quota_cooldown_ms {
            config.quota_cooldown = millis(ms);
        }
        set_if(&mut config.trending_limit, self.trending_limit);
        set_if(&mut config.related_limit, self.related_limit);
        set_if(&mut config.enrichment_limit, self.enrichment_limit);
        set_if(&mut config.top_queries_taken, self.top_queries_taken);
        set_if(&mut config.rising_queries_taken, self.rising_queries_taken);
        set_if(&mut config.detail_list_limit, self.detail_list_limit);
        set_if(&mut config.geo_limit, self.geo_limit);
        set_if(&mut config.enrich_related, self.enrich_related);
        set_if(&mut config.keep_partial_samples, self.keep_partial_samples);

        set_if(&mut config.client.language, self.client.language);
        set_if(&mut config.client.tz_offset_minutes, self.client.tz_offset_minutes);
        set_if(&mut config.client.retries, self.client.retries);
        set_if(&mut config.client.backoff_factor, self.client.backoff_factor);
        if let Some(ms) = self.client.timeout_ms {
            config.client.timeout = millis(ms);
        }

        set_if(&mut config.transient_retry.max_retries, self.retry.transient_retries);
        let retry = self.retry;
        if retry.backoff_base_ms.is_some()
            || retry.backoff_factor.is_some()
            || retry.backoff_max_ms.is_some()
            || retry.jitter.is_some()
        {
            let (base, factor, max, jitter) = match config.transient_retry.backoff {
                Backoff::Exponential {
                    base,
                    factor,
                    max,
                    jitter,
                } => (base, factor, max, jitter),
                Backoff::Fixed { delay } => (delay, 1.0, delay, false),
            };
            config.transient_retry.backoff = Backoff::Exponential {
                base: retry.backoff_base_ms.map_or(base, millis),
                factor: retry.backoff_factor.unwrap_or(factor),
                max: retry.backoff_max_ms.map_or(max, millis),
                jitter: retry.jitter.unwrap_or(jitter),
            };
        }
    }
}

fn set_if<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
