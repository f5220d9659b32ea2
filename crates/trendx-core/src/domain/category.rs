use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Provider topic category attached to a trending metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendCategory {
    #[default]
    All,
    Business,
    Entertainment,
    Health,
    ScienceTech,
    Sports,
    TopStories,
}

impl TrendCategory {
    pub const ALL: [Self; 7] = [
        Self::All,
        Self::Business,
        Self::Entertainment,
        Self::Health,
        Self::ScienceTech,
        Self::Sports,
        Self::TopStories,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::ScienceTech => "science_tech",
            Self::Sports => "sports",
            Self::TopStories => "top_stories",
        }
    }
}

impl Display for TrendCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendCategory {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or(ValidationError::InvalidCategory { value: normalized })
    }
}
