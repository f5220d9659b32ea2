use std::fmt::{Display, Formatter};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::source::{SourceError, SourceErrorKind};

/// Outcome of inspecting a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// The provider signaled rate limiting.
    QuotaExceeded,
    /// Temporary condition; the same call may succeed later.
    Transient,
    /// Malformed, rejected or unknown failure.
    Fatal,
}

impl FailureClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuotaExceeded => "quota_exceeded",
            Self::Transient => "transient",
            Self::Fatal => "fatal",
        }
    }
}

impl Display for FailureClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const fn classify(error: &SourceError) -> FailureClass {
    match error.kind() {
        SourceErrorKind::RateLimited => FailureClass::QuotaExceeded,
        SourceErrorKind::Unavailable | SourceErrorKind::Timeout => FailureClass::Transient,
        SourceErrorKind::MalformedResponse
        | SourceErrorKind::InvalidRequest
        | SourceErrorKind::Internal => FailureClass::Fatal,
    }
}

/// Logging and cooldown applied to every failed provider call.
///
/// `settle` never swallows: it always hands the error back for propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    quota_cooldown: Duration,
}

impl FailurePolicy {
    pub const DEFAULT_QUOTA_COOLDOWN: Duration = Duration::from_secs(60);

    pub const fn new(quota_cooldown: Duration) -> Self {
        Self { quota_cooldown }
    }

    pub const fn quota_cooldown(&self) -> Duration {
        self.quota_cooldown
    }

    /// Classifies and logs `error` without waiting.
    pub fn observe(&self, error: &SourceError, operation: &str) -> FailureClass {
        let class = classify(error);
        match class {
            FailureClass::QuotaExceeded => {
                tracing::warn!(operation, error = %error, "provider quota exceeded");
            }
            FailureClass::Transient => {
                tracing::warn!(operation, error = %error, "transient provider failure");
            }
            FailureClass::Fatal => {
                tracing::error!(operation, error = %error, "provider call failed");
            }
        }
        class
    }

    /// Classifies and logs `error`, waits out the quota cooldown when the
    /// provider signaled rate limiting, then returns the class and the error.
    pub fn settle(&self, error: SourceError, operation: &str) -> (FailureClass, SourceError) {
        let class = self.observe(&error, operation);
        if class == FailureClass::QuotaExceeded && !self.quota_cooldown.is_zero() {
            tracing::warn!(
                operation,
                cooldown_ms = self.quota_cooldown.as_millis() as u64,
                "backing off after quota signal"
            );
            thread::sleep(self.quota_cooldown);
        }

        (class, error)
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUOTA_COOLDOWN)
    }
}
