use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Provider timeframe expression such as `today 12-m` or `now 7-d`.
///
/// The expression is passed through to the provider; only its shape is checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe(String);

impl Timeframe {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|ch| ch.is_ascii_graphic() || ch == ' ');
        if !valid {
            return Err(ValidationError::InvalidTimeframe {
                value: input.to_owned(),
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Current day, used for trending lists.
    pub fn today() -> Self {
        Self(String::from("today"))
    }

    /// Trailing twelve months, used for detail and related lookups.
    pub fn past_year() -> Self {
        Self(String::from("today 12-m"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Timeframe {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timeframe> for String {
    fn from(value: Timeframe) -> Self {
        value.0
    }
}
