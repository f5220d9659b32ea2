//! Behavior every `TrendsSource` implementation must show to the collector.

use trendx_core::source::{normalize_geo, normalize_series};
use trendx_core::{
    FixtureSource, Keyword, Region, Timeframe, TrendsCollector, TrendsSource,
};

struct SourceCase {
    name: &'static str,
    source: Box<dyn TrendsSource>,
}

fn source_cases() -> Vec<SourceCase> {
    vec![
        SourceCase {
            name: "fixture",
            source: Box::new(FixtureSource::default()),
        },
        SourceCase {
            name: "fixture-short",
            source: Box::new(FixtureSource::with_weeks(3)),
        },
    ]
}

fn keyword(text: &str) -> Keyword {
    Keyword::parse(text).expect("valid keyword")
}

#[test]
fn trending_entries_are_usable_keywords() {
    let region = Region::parse("US").expect("valid region");
    for case in source_cases() {
        let entries = case
            .source
            .fetch_trending(&region)
            .unwrap_or_else(|error| panic!("source '{}' trending failed: {error}", case.name));

        for entry in entries {
            assert!(
                Keyword::parse(&entry).is_ok(),
                "source '{}': trending entry {entry:?} is not a valid keyword",
                case.name
            );
        }
    }
}

#[test]
fn interest_series_normalizes_and_is_chronological() {
    for case in source_cases() {
        let raw = case
            .source
            .fetch_interest_series(&keyword("world series"), &Timeframe::past_year())
            .unwrap_or_else(|error| panic!("source '{}' series failed: {error}", case.name));

        let series = normalize_series(&raw)
            .unwrap_or_else(|error| panic!("source '{}' series malformed: {error}", case.name));
        assert!(
            series.windows(2).all(|pair| pair[0].at < pair[1].at),
            "source '{}': series is not chronological",
            case.name
        );
        assert!(
            series.iter().rev().skip(1).all(|point| !point.partial),
            "source '{}': only the trailing sample may be partial",
            case.name
        );
    }
}

#[test]
fn related_and_geo_answers_normalize() {
    for case in source_cases() {
        let related = case
            .source
            .fetch_related(&keyword("mortgage rates"), &Timeframe::past_year())
            .unwrap_or_else(|error| panic!("source '{}' related failed: {error}", case.name));
        assert!(
            related.top_queries.iter().all(|query| !query.trim().is_empty()),
            "source '{}': empty related query",
            case.name
        );

        let geo = case
            .source
            .fetch_geo(&keyword("mortgage rates"), &Timeframe::past_year())
            .unwrap_or_else(|error| panic!("source '{}' geo failed: {error}", case.name));
        let top = normalize_geo(geo, 10)
            .unwrap_or_else(|error| panic!("source '{}' geo malformed: {error}", case.name));
        assert!(top.len() <= 10);
        assert!(top.values().all(|intensity| *intensity > 0));
    }
}

#[test]
fn collector_runs_every_operation_against_fixture() {
    let config = trendx_core::CollectorConfig {
        min_interval: std::time::Duration::ZERO,
        enrich_related: true,
        ..trendx_core::CollectorConfig::default()
    };
    let mut collector = TrendsCollector::with_source(config, FixtureSource::default());

    let trending = collector.get_trending_keywords("US", "today");
    assert!(!trending.is_empty());
    for metric in &trending {
        assert!(metric.related_keywords.len() <= 20);
        assert!(metric
            .related_keywords
            .iter()
            .all(|related| related != &metric.keyword));
    }

    let detail = collector
        .get_keyword_details("heat pump")
        .expect("fixture details succeed");
    assert_eq!(detail.interest_series.len(), 52);
    assert!(detail.geo_distribution.len() <= 10);
    assert!(detail.related_queries.len() <= 10);

    let related = collector.get_related_keywords("heat pump");
    assert!(!related.is_empty());
    assert!(!related.iter().any(|term| term == "heat pump"));
    assert!(collector.last_failure().is_none());
}
