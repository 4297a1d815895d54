//! Data models representing Lichess profile and rating-history documents.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// A Lichess player profile as returned by `GET /api/user/{username}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub profile: Option<ProfileInfo>,
    #[serde(default)]
    pub count: GameCount,
    #[serde(default)]
    pub play_time: PlayTime,
    /// Account creation time in epoch milliseconds
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub perfs: HashMap<String, Performance>,
}

impl Profile {
    /// Performance record for a mode, if the player has one
    pub fn perf(&self, mode: TimeControl) -> Option<&Performance> {
        self.perfs.get(mode.key())
    }

    /// Games played in a mode (0 when the mode is missing)
    pub fn games_in(&self, mode: TimeControl) -> u32 {
        self.perf(mode).map(|p| p.games).unwrap_or(0)
    }

    /// "First Last" from the optional profile block, if any part is set
    pub fn full_name(&self) -> Option<String> {
        let info = self.profile.as_ref()?;
        if let Some(real) = info.real_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(real.trim().to_string());
        }
        let parts: Vec<&str> = [info.first_name.as_deref(), info.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn bio(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.bio.as_deref())
            .filter(|b| !b.trim().is_empty())
    }

    /// Total play time in hours
    pub fn hours_played(&self) -> f64 {
        self.play_time.total as f64 / 3600.0
    }

    pub fn location(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.location.as_deref())
            .filter(|l| !l.trim().is_empty())
    }

    pub fn member_since(&self) -> Option<DateTime<Utc>> {
        self.created_at.and_then(DateTime::from_timestamp_millis)
    }
}

/// Free-form personal details attached to a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub real_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Aggregate game counts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameCount {
    pub all: u64,
    pub win: u64,
}

/// Total play time, in seconds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayTime {
    pub total: u64,
}

/// Per-mode rating statistics.
///
/// Lichess uses other shapes for some perf keys (storm/racer carry
/// `runs`/`score`); those fall back to an unplayed record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Performance {
    pub rating: Option<i32>,
    pub games: u32,
    pub prog: i32,
    pub prov: bool,
}

impl Performance {
    /// Rating worth displaying; unplayed modes have none
    pub fn display_rating(&self) -> Option<i32> {
        if self.games == 0 {
            None
        } else {
            self.rating
        }
    }
}

/// A single raw history point: `[year, zero-based month, day, rating]`
pub type RawPoint = [i32; 4];

/// Rating history for one mode as returned by `GET /api/user/{username}/rating-history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingHistoryEntry {
    pub name: String,
    #[serde(default)]
    pub points: Vec<RawPoint>,
}

/// A history point ready for charting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedHistoryPoint {
    /// Short human-readable date, e.g. "Jan 15, 2023"
    pub date: String,
    /// Milliseconds since the Unix epoch at UTC midnight
    pub timestamp: i64,
    pub rating: i32,
}

/// Game speed categories shown on the dashboard, in priority order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeControl {
    Bullet,
    #[default]
    Blitz,
    Rapid,
    Classical,
    Puzzle,
}

impl TimeControl {
    pub const ALL: [TimeControl; 5] = [
        TimeControl::Bullet,
        TimeControl::Blitz,
        TimeControl::Rapid,
        TimeControl::Classical,
        TimeControl::Puzzle,
    ];

    /// Key used in the profile's `perfs` map
    pub fn key(self) -> &'static str {
        match self {
            TimeControl::Bullet => "bullet",
            TimeControl::Blitz => "blitz",
            TimeControl::Rapid => "rapid",
            TimeControl::Classical => "classical",
            TimeControl::Puzzle => "puzzle",
        }
    }

    /// Name used by the rating-history endpoint (also the tile title)
    pub fn history_name(self) -> &'static str {
        match self {
            TimeControl::Bullet => "Bullet",
            TimeControl::Blitz => "Blitz",
            TimeControl::Rapid => "Rapid",
            TimeControl::Classical => "Classical",
            TimeControl::Puzzle => "Puzzles",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Relative window applied to the chart, ordered narrowest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeRange {
    ThreeMonths,
    SixMonths,
    OneYear,
    #[default]
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::All,
    ];

    /// Window length in milliseconds; `None` means unbounded
    pub fn window_ms(self) -> Option<i64> {
        match self {
            TimeRange::ThreeMonths => Some(90 * DAY_MS),
            TimeRange::SixMonths => Some(180 * DAY_MS),
            TimeRange::OneYear => Some(365 * DAY_MS),
            TimeRange::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
            TimeRange::All => "All Time",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(Self::ALL.len() - 1)
    }

    /// Next shorter window (saturates at 3M)
    pub fn narrower(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// Next longer window (saturates at All)
    pub fn wider(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3m" => Ok(TimeRange::ThreeMonths),
            "6m" => Ok(TimeRange::SixMonths),
            "1y" => Ok(TimeRange::OneYear),
            "all" => Ok(TimeRange::All),
            other => Err(format!("unknown time range '{other}' (expected 3m, 6m, 1y or all)")),
        }
    }
}

/// Profile and history returned together by a successful search
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub profile: Profile,
    pub history: Vec<RatingHistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_JSON: &str = r#"{
        "id": "thibault",
        "username": "thibault",
        "online": true,
        "url": "https://lichess.org/@/thibault",
        "createdAt": 1290415680000,
        "profile": {"firstName": "Thibault", "lastName": "Duplessis", "bio": "I turn coffee into bugs.", "location": "Paris"},
        "count": {"all": 9435, "rated": 7060, "win": 4215, "loss": 4676, "draw": 317, "ai": 12},
        "playTime": {"total": 4261896, "tv": 0},
        "perfs": {
            "blitz": {"games": 8057, "rating": 1611, "rd": 45, "prog": -9, "prov": false},
            "puzzle": {"games": 1919, "rating": 1949, "rd": 84, "prog": 10},
            "storm": {"runs": 44, "score": 61}
        }
    }"#;

    #[test]
    fn test_parse_profile_document() {
        let profile: Profile = serde_json::from_str(PROFILE_JSON).unwrap();
        assert_eq!(profile.username, "thibault");
        assert!(profile.online);
        assert_eq!(profile.count.all, 9435);
        assert_eq!(profile.count.win, 4215);
        assert_eq!(profile.games_in(TimeControl::Blitz), 8057);
        assert_eq!(profile.perf(TimeControl::Blitz).unwrap().prog, -9);
        // Missing modes count as unplayed
        assert_eq!(profile.games_in(TimeControl::Bullet), 0);
        // Storm has a different shape and falls back to defaults
        assert_eq!(profile.perfs["storm"], Performance::default());
    }

    #[test]
    fn test_profile_display_helpers() {
        let profile: Profile = serde_json::from_str(PROFILE_JSON).unwrap();
        assert_eq!(profile.full_name().as_deref(), Some("Thibault Duplessis"));
        assert_eq!(profile.bio(), Some("I turn coffee into bugs."));
        assert_eq!(profile.location(), Some("Paris"));
        assert!((profile.hours_played() - 1183.86).abs() < 0.01);
        assert_eq!(profile.member_since().unwrap().format("%Y").to_string(), "2010");
    }

    #[test]
    fn test_minimal_profile_defaults() {
        let profile: Profile =
            serde_json::from_str(r#"{"id": "x", "username": "X"}"#).unwrap();
        assert!(profile.perfs.is_empty());
        assert_eq!(profile.count.all, 0);
        assert!(profile.full_name().is_none());
        assert!(profile.bio().is_none());
    }

    #[test]
    fn test_unplayed_mode_has_no_display_rating() {
        let perf = Performance { rating: Some(1500), games: 0, prog: 0, prov: true };
        assert_eq!(perf.display_rating(), None);
        let perf = Performance { games: 3, ..perf };
        assert_eq!(perf.display_rating(), Some(1500));
    }

    #[test]
    fn test_parse_history_document() {
        let json = r#"[{"name": "Bullet", "points": [[2011, 0, 8, 1472], [2011, 0, 9, 1332]]},
                       {"name": "Puzzles", "points": []}]"#;
        let history: Vec<RatingHistoryEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].points[1], [2011, 0, 9, 1332]);
        assert!(history[1].points.is_empty());
    }

    #[test]
    fn test_time_control_names() {
        assert_eq!(TimeControl::Puzzle.key(), "puzzle");
        assert_eq!(TimeControl::Puzzle.history_name(), "Puzzles");
        assert_eq!(TimeControl::Bullet.prev(), TimeControl::Puzzle);
        assert_eq!(TimeControl::Puzzle.next(), TimeControl::Bullet);
    }

    #[test]
    fn test_time_range_parse_and_step() {
        assert_eq!("3M".parse::<TimeRange>(), Ok(TimeRange::ThreeMonths));
        assert_eq!("all".parse::<TimeRange>(), Ok(TimeRange::All));
        assert!("2w".parse::<TimeRange>().is_err());

        assert_eq!(TimeRange::ThreeMonths.narrower(), TimeRange::ThreeMonths);
        assert_eq!(TimeRange::All.wider(), TimeRange::All);
        assert_eq!(TimeRange::SixMonths.wider(), TimeRange::OneYear);
        assert_eq!(TimeRange::default(), TimeRange::All);
        assert_eq!(TimeRange::OneYear.window_ms(), Some(365 * 86_400_000));
    }
}
