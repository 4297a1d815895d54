//! Reshapes raw rating-history tuples into chartable points.
//!
//! The API encodes every point as `[year, month, day, rating]` with a
//! zero-based month. Points are kept in delivery order.

use chrono::{Duration, NaiveDate};

use super::models::{FormattedHistoryPoint, RatingHistoryEntry, RawPoint, TimeRange};
use super::scale::{rating_bounds, RatingBounds};

/// Format used for point labels, e.g. "Jan 15, 2023"
const DATE_LABEL_FORMAT: &str = "%b %-d, %Y";

/// Chart-ready view of one mode's history for a time range
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Points inside the selected range
    pub points: Vec<FormattedHistoryPoint>,
    /// Number of points for the mode before range filtering
    pub total_points: usize,
    /// Extremes and padded axis domain; `None` when `points` is empty
    pub bounds: Option<RatingBounds>,
}

impl Projection {
    /// The mode has no recorded history at all
    pub fn is_empty_series(&self) -> bool {
        self.total_points == 0
    }
}

/// Build a UTC calendar date the way a normalising date constructor does:
/// months past December roll into later years and days past the month end
/// roll into later months.
fn calendar_date(year: i32, month0: i32, day: i32) -> Option<NaiveDate> {
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = month0.rem_euclid(12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(i64::from(day) - 1))
}

/// Convert one raw tuple into a formatted point
pub fn format_point(point: &RawPoint) -> Option<FormattedHistoryPoint> {
    let [year, month0, day, rating] = *point;
    let date = calendar_date(year, month0, day)?;
    let timestamp = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
    Some(FormattedHistoryPoint {
        date: date.format(DATE_LABEL_FORMAT).to_string(),
        timestamp,
        rating,
    })
}

/// Format the history of the entry whose name matches `mode_name` exactly.
///
/// A mode with no entry yields an empty series.
pub fn format_history(history: &[RatingHistoryEntry], mode_name: &str) -> Vec<FormattedHistoryPoint> {
    let Some(entry) = history.iter().find(|h| h.name == mode_name) else {
        return Vec::new();
    };

    let points: Vec<FormattedHistoryPoint> = entry
        .points
        .iter()
        .filter_map(|p| {
            let formatted = format_point(p);
            if formatted.is_none() {
                tracing::debug!(mode = mode_name, point = ?p, "dropping point outside calendar range");
            }
            formatted
        })
        .collect();

    if !is_chronological(&points) {
        tracing::warn!(mode = mode_name, "rating history is not in chronological order");
    }

    points
}

/// Keep points no older than the range window, measured back from `now_ms`
pub fn filter_by_range(
    points: &[FormattedHistoryPoint],
    range: TimeRange,
    now_ms: i64,
) -> Vec<FormattedHistoryPoint> {
    match range.window_ms() {
        None => points.to_vec(),
        Some(window) => {
            let cutoff = now_ms - window;
            points
                .iter()
                .filter(|p| p.timestamp >= cutoff)
                .cloned()
                .collect()
        }
    }
}

/// True when timestamps never decrease
pub fn is_chronological(points: &[FormattedHistoryPoint]) -> bool {
    points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}

/// Format, filter and scale one mode's history
pub fn project(
    history: &[RatingHistoryEntry],
    mode_name: &str,
    range: TimeRange,
    now_ms: i64,
) -> Projection {
    let formatted = format_history(history, mode_name);
    let points = filter_by_range(&formatted, range, now_ms);
    let bounds = rating_bounds(&points);
    Projection {
        points,
        total_points: formatted.len(),
        bounds,
    }
}
