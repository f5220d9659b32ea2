use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub const MAX_KEYWORD_LEN: usize = 100;

const FORBIDDEN_CHARS: [char; 4] = ['<', '>', '"', '\''];

/// Search keyword that passed the shared keyword rule.
///
/// The same rule applies to trending keywords and to every related keyword
/// attached to a metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Trims the input and checks length and markup-control characters.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }

        let len = trimmed.chars().count();
        if len > MAX_KEYWORD_LEN {
            return Err(ValidationError::KeywordTooLong {
                len,
                max: MAX_KEYWORD_LEN,
            });
        }

        if let Some((index, ch)) = trimmed
            .chars()
            .enumerate()
            .find(|(_, ch)| FORBIDDEN_CHARS.contains(ch))
        {
            return Err(ValidationError::KeywordInvalidChar { ch, index });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Keyword {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Keyword {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Keyword> for String {
    fn from(value: Keyword) -> Self {
        value.0
    }
}

/// Keeps only the entries that pass the keyword rule, in input order.
pub fn retain_valid_keywords<I, S>(candidates: I) -> Vec<Keyword>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter_map(|candidate| Keyword::parse(candidate.as_ref()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_keyword() {
        let keyword = Keyword::parse("  rust async  ").expect("keyword should parse");
        assert_eq!(keyword.as_str(), "rust async");
    }

    #[test]
    fn rejects_whitespace_only() {
        let err = Keyword::parse("   ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyKeyword);
    }

    #[test]
    fn accepts_exactly_max_len() {
        let input = "k".repeat(MAX_KEYWORD_LEN);
        assert!(Keyword::parse(&input).is_ok());

        let err = Keyword::parse(&format!("{input}k")).expect_err("must fail");
        assert!(matches!(err, ValidationError::KeywordTooLong { len: 101, .. }));
    }

    #[test]
    fn rejects_markup_characters() {
        let err = Keyword::parse("<script>").expect_err("must fail");
        assert_eq!(err, ValidationError::KeywordInvalidChar { ch: '<', index: 0 });

        assert!(Keyword::parse("it's").is_err());
        assert!(Keyword::parse("say \"hi\"").is_err());
    }

    #[test]
    fn retain_valid_skips_rejects() {
        let kept = retain_valid_keywords(["ok", "", "<bad>", " fine "]);
        let kept: Vec<&str> = kept.iter().map(Keyword::as_str).collect();
        assert_eq!(kept, vec!["ok", "fine"]);
    }
}
