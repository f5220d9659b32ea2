use crate::source::{RawGeo, RawSample, Reading, RelatedTerms, SourceError, TrendsSource};
use crate::{Keyword, Region, Timeframe, UtcDateTime};

const WEEKS_PER_YEAR: u32 = 52;

/// Deterministic offline provider.
///
/// Values derive from a hash of the keyword, so repeated calls answer the
/// same readings; only timestamps follow the wall clock. The last weekly
/// sample is flagged partial the way a live provider flags the running week.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    weeks: u32,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self {
            weeks: WEEKS_PER_YEAR,
        }
    }
}

impl FixtureSource {
    /// Fixture answering `weeks` samples per interest series.
    pub fn with_weeks(weeks: u32) -> Self {
        Self { weeks }
    }
}

impl TrendsSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch_trending(&self, region: &Region) -> Result<Vec<String>, SourceError> {
        Ok(trending_catalog(region.as_str())
            .iter()
            .map(|entry| (*entry).to_owned())
            .collect())
    }

    fn fetch_interest_series(
        &self,
        keyword: &Keyword,
        _timeframe: &Timeframe,
    ) -> Result<Vec<RawSample>, SourceError> {
        let seed = keyword_seed(keyword.as_str());
        let now = UtcDateTime::now();
        let base = 20 + (seed % 40) as i64;
        // Slope in tenths of a point per week, between -3.0 and +3.0.
        let slope = (seed % 61) as i64 - 30;
        let weeks = self.weeks;

        let samples = (0..weeks)
            .map(|index| {
                let at = now.weeks_before(weeks - 1 - index);
                let wobble = ((seed >> (index % 32)) % 7) as i64;
                let value = (base + slope * i64::from(index) / 10 + wobble).clamp(0, 100);
                let reading = if index == 0 && seed % 3 == 0 {
                    Reading::Missing
                } else {
                    Reading::Present(value)
                };

                if index + 1 == weeks {
                    RawSample::partial(at, reading)
                } else {
                    RawSample::new(at, reading)
                }
            })
            .collect();

        Ok(samples)
    }

    fn fetch_related(
        &self,
        keyword: &Keyword,
        _timeframe: &Timeframe,
    ) -> Result<RelatedTerms, SourceError> {
        let term = keyword.as_str();
        let topics = ["news", "history", "community", "events"]
            .iter()
            .map(|suffix| format!("{term} {suffix}"))
            .collect();
        // The provider lists the keyword itself among its own top queries.
        let top_queries = vec![
            term.to_owned(),
            format!("{term} today"),
            format!("what is {term}"),
            format!("{term} near me"),
            format!("best {term}"),
        ];
        let rising_queries = vec![
            format!("{term} 2025"),
            format!("best {term}"),
            format!("{term} explained"),
        ];

        Ok(RelatedTerms {
            topics,
            top_queries,
            rising_queries,
        })
    }

    fn fetch_geo(
        &self,
        keyword: &Keyword,
        _timeframe: &Timeframe,
    ) -> Result<Vec<RawGeo>, SourceError> {
        let seed = keyword_seed(keyword.as_str());
        let geo = GEO_REGIONS
            .iter()
            .enumerate()
            .map(|(index, region)| {
                let spread = (seed.rotate_left(index as u32 * 5) % 101) as i64;
                let reading = if spread < 8 {
                    Reading::Missing
                } else {
                    Reading::Present(spread)
                };
                RawGeo::new(*region, reading)
            })
            .collect();

        Ok(geo)
    }
}

const GEO_REGIONS: [&str; 14] = [
    "United States",
    "Canada",
    "United Kingdom",
    "Germany",
    "France",
    "India",
    "Brazil",
    "Australia",
    "Japan",
    "Mexico",
    "Nigeria",
    "Philippines",
    "Spain",
    "South Africa",
];

fn trending_catalog(region: &str) -> &'static [&'static str] {
    match region {
        "US" => &[
            "world series",
            "solar eclipse",
            "mortgage rates",
            "college football",
            "heat pump",
            "election results",
            "nba draft",
            "hurricane tracker",
        ],
        "GB" => &[
            "premier league",
            "bank holiday",
            "wimbledon",
            "energy price cap",
            "glastonbury",
        ],
        "DE" => &["bundesliga", "oktoberfest", "deutsche bahn", "wetter"],
        _ => &["football", "weather", "news", "music festival"],
    }
}

fn keyword_seed(keyword: &str) -> u64 {
    keyword
        .bytes()
        .fold(0_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(u64::from(byte)))
}
