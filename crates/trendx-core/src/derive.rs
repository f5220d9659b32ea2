//! Numeric derivation over interest series.
//!
//! Growth rate and volume are heuristics, not calibrated statistics: growth
//! compares two short trailing windows and volume rescales the mean relative
//! interest by a fixed factor. Both sit behind [`MetricModel`] so the
//! collector can run a different model without changing its sequencing.

use std::collections::HashSet;

use crate::InterestPoint;

pub const RECENT_WINDOW: usize = 4;
pub const PREVIOUS_WINDOW: usize = 4;
pub const VOLUME_SCALE: f64 = 10_000.0;
pub const VOLUME_FLOOR: u64 = 100;

/// Related-keyword cap used when enriching trending keywords.
pub const TRENDING_RELATED_CAP: usize = 20;

/// Strategy computing growth and volume from a chronological series.
pub trait MetricModel: Send {
    fn growth_rate(&self, series: &[InterestPoint]) -> f64;
    fn estimate_volume(&self, series: &[InterestPoint]) -> u64;
}

/// Trailing-window growth and scaled-mean volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicModel {
    pub recent_window: usize,
    pub previous_window: usize,
    pub volume_scale: f64,
    pub volume_floor: u64,
}

impl Default for HeuristicModel {
    fn default() -> Self {
        Self {
            recent_window: RECENT_WINDOW,
            previous_window: PREVIOUS_WINDOW,
            volume_scale: VOLUME_SCALE,
            volume_floor: VOLUME_FLOOR,
        }
    }
}

impl MetricModel for HeuristicModel {
    fn growth_rate(&self, series: &[InterestPoint]) -> f64 {
        windowed_growth_rate(series, self.recent_window, self.previous_window)
    }

    fn estimate_volume(&self, series: &[InterestPoint]) -> u64 {
        scaled_volume(series, self.volume_scale, self.volume_floor)
    }
}

/// Percent change between the mean of the last four points and the mean of
/// the four before them, rounded to two decimals with ties to even.
///
/// Shorter series use whatever points each window holds. Fewer than two points,
/// or an empty window, yields `0.0`. A zero previous mean yields `100.0` when
/// the recent mean is positive.
pub fn growth_rate(series: &[InterestPoint]) -> f64 {
    windowed_growth_rate(series, RECENT_WINDOW, PREVIOUS_WINDOW)
}

/// Mean of the positive samples times 10,000, floored at 100.
///
/// A series without any positive sample estimates to `0`; the floor only
/// applies once at least one positive sample exists.
pub fn estimate_volume(series: &[InterestPoint]) -> u64 {
    scaled_volume(series, VOLUME_SCALE, VOLUME_FLOOR)
}

/// Union of `primary` then `secondary` with exact duplicates and `exclude`
/// removed, truncated to `cap`.
///
/// First occurrences keep their position, so the output is deterministic and
/// re-applying the function to its own output returns it unchanged.
pub fn dedupe_related<A, B>(primary: A, secondary: B, exclude: &str, cap: usize) -> Vec<String>
where
    A: IntoIterator,
    A::Item: Into<String>,
    B: IntoIterator,
    B::Item: Into<String>,
{
    let mut seen = HashSet::new();
    primary
        .into_iter()
        .map(Into::into)
        .chain(secondary.into_iter().map(Into::into))
        .filter(|term| term != exclude)
        .filter(|term| seen.insert(term.clone()))
        .take(cap)
        .collect()
}

/// Drops the trailing partial sample unless the caller asks to keep it.
pub fn complete_samples(series: &[InterestPoint], keep_partial: bool) -> &[InterestPoint] {
    match series.split_last() {
        Some((last, head)) if last.partial && !keep_partial => head,
        _ => series,
    }
}

fn windowed_growth_rate(series: &[InterestPoint], recent: usize, previous: usize) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }

    let recent_start = series.len().saturating_sub(recent);
    let previous_start = recent_start.saturating_sub(previous);
    let recent_values = &series[recent_start..];
    let previous_values = &series[previous_start..recent_start];

    let (Some(recent_avg), Some(previous_avg)) = (mean(recent_values), mean(previous_values))
    else {
        return 0.0;
    };

    if previous_avg == 0.0 {
        return if recent_avg > 0.0 { 100.0 } else { 0.0 };
    }

    round_to_hundredths((recent_avg - previous_avg) / previous_avg * 100.0)
}

fn scaled_volume(series: &[InterestPoint], scale: f64, floor: u64) -> u64 {
    let positive: Vec<u8> = series
        .iter()
        .map(|point| point.value)
        .filter(|value| *value > 0)
        .collect();
    if positive.is_empty() {
        return 0;
    }

    let mean = positive.iter().map(|value| f64::from(*value)).sum::<f64>() / positive.len() as f64;
    if mean <= 0.0 {
        return 0;
    }

    // Truncation toward zero matches integer conversion of the scaled mean.
    let scaled = (mean * scale).trunc();
    let estimate = if scaled.is_finite() && scaled > 0.0 {
        scaled as u64
    } else {
        0
    };
    estimate.max(floor)
}

fn mean(points: &[InterestPoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let total: f64 = points.iter().map(|point| f64::from(point.value)).sum();
    Some(total / points.len() as f64)
}

/// Exact ties round to even, so 3.125 becomes 3.12.
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
