//! Rating extremes and padded y-axis domain for the chart.

use super::models::FormattedHistoryPoint;

/// Fraction of the rating spread added above and below the extremes
const DOMAIN_PADDING: f64 = 0.1;

/// Extremes of a rating series and the axis domain derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBounds {
    pub min: i32,
    pub max: i32,
    pub domain_low: i64,
    pub domain_high: i64,
}

/// Round half up, matching how browsers round chart domains
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Scan the series once for its extremes and pad the domain by 10% of the spread.
///
/// Returns `None` for an empty series; callers render placeholders.
pub fn rating_bounds(points: &[FormattedHistoryPoint]) -> Option<RatingBounds> {
    let (min, max) = points.iter().fold(None, |acc, p| match acc {
        None => Some((p.rating, p.rating)),
        Some((lo, hi)) => Some((p.rating.min(lo), p.rating.max(hi))),
    })?;

    let padding = (f64::from(max) - f64::from(min)) * DOMAIN_PADDING;
    Some(RatingBounds {
        min,
        max,
        domain_low: round_half_up(f64::from(min) - padding),
        domain_high: round_half_up(f64::from(max) + padding),
    })
}

/// Current / peak / lowest figures shown under the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodSummary {
    pub current: Option<i32>,
    pub peak: Option<i32>,
    pub lowest: Option<i32>,
}

impl PeriodSummary {
    pub fn new(points: &[FormattedHistoryPoint], bounds: Option<&RatingBounds>) -> Self {
        PeriodSummary {
            current: points.last().map(|p| p.rating),
            peak: bounds.map(|b| b.max),
            lowest: bounds.map(|b| b.min),
        }
    }
}
