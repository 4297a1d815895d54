//! Dashboard state and its transitions.
//!
//! All mutable UI state lives in [`DashboardState`]. It only changes through
//! [`DashboardState::apply`], which takes one [`Event`] and may ask the caller
//! to perform an [`Effect`]. Network work never happens here.

use crate::data::{
    history, selector, FetchError, Profile, Projection, RatingHistoryEntry, SearchResult,
    TimeControl, TimeRange,
};

/// Something that happened: a key press or a finished search
#[derive(Debug)]
pub enum Event {
    /// Append a character to the search input
    Input(char),
    /// Remove the last character from the search input
    Backspace,
    /// Empty the search input
    ClearInput,
    /// Start a search for the current input
    Submit,
    /// Re-run the last successful search
    Refresh,
    /// Abandon the outstanding search
    Cancel,
    /// A search task finished
    SearchFinished {
        seq: u64,
        outcome: Result<SearchResult, FetchError>,
    },
    SelectMode(TimeControl),
    SelectRange(TimeRange),
}

/// Work the caller must perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch profile and history for `username`, reporting back with `seq`
    Search { seq: u64, username: String },
}

/// Everything the dashboard renders from
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Text in the search box
    pub query: String,
    /// Resolved username of the profile on screen
    pub searched_username: Option<String>,
    pub profile: Option<Profile>,
    pub history: Vec<RatingHistoryEntry>,
    /// Error banner text from the last search
    pub error: Option<String>,
    pub selected_mode: TimeControl,
    pub time_range: TimeRange,
    /// Sequence number of the most recently issued search
    last_seq: u64,
    /// Sequence number of the search whose result is still awaited
    in_flight: Option<u64>,
}

impl DashboardState {
    #[allow(dead_code)] // Used in tests
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a preset range (from the command line)
    pub fn with_range(time_range: TimeRange) -> Self {
        DashboardState {
            time_range,
            ..Self::default()
        }
    }

    /// A search is outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Chart data for the selected mode and range, evaluated at `now_ms`
    pub fn projection(&self, now_ms: i64) -> Projection {
        history::project(
            &self.history,
            self.selected_mode.history_name(),
            self.time_range,
            now_ms,
        )
    }

    /// Apply one event, returning the effect it requests (if any)
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::Input(c) => {
                if !c.is_control() {
                    self.query.push(c);
                }
                None
            }
            Event::Backspace => {
                self.query.pop();
                None
            }
            Event::ClearInput => {
                self.query.clear();
                None
            }
            Event::Submit => {
                let username = self.query.trim().to_string();
                self.start_search(username)
            }
            Event::Refresh => {
                let username = self.searched_username.clone()?;
                self.start_search(username)
            }
            Event::Cancel => {
                if let Some(seq) = self.in_flight.take() {
                    tracing::info!(seq, "search cancelled");
                }
                None
            }
            Event::SearchFinished { seq, outcome } => {
                self.finish_search(seq, outcome);
                None
            }
            Event::SelectMode(mode) => {
                self.selected_mode = mode;
                None
            }
            Event::SelectRange(range) => {
                self.time_range = range;
                None
            }
        }
    }

    fn start_search(&mut self, username: String) -> Option<Effect> {
        if username.is_empty() || self.is_loading() {
            return None;
        }

        self.last_seq += 1;
        let seq = self.last_seq;
        self.in_flight = Some(seq);
        self.error = None;
        self.profile = None;
        self.history.clear();

        tracing::info!(seq, %username, "search started");
        Some(Effect::Search { seq, username })
    }

    fn finish_search(&mut self, seq: u64, outcome: Result<SearchResult, FetchError>) {
        if self.in_flight != Some(seq) {
            tracing::debug!(seq, current = ?self.in_flight, "discarding stale search result");
            return;
        }
        self.in_flight = None;

        match outcome {
            Ok(SearchResult { profile, history }) => {
                self.selected_mode = selector::default_mode(&profile);
                self.searched_username = Some(profile.username.clone());
                self.profile = Some(profile);
                self.history = history;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(username: &str, blitz_games: u32) -> SearchResult {
        let profile_json = format!(
            r#"{{"id": "{id}", "username": "{username}",
                "perfs": {{"bullet": {{"games": 0}}, "blitz": {{"games": {blitz_games}, "rating": 1700, "prog": -5}}, "rapid": {{"games": 40}}}}}}"#,
            id = username.to_lowercase()
        );
        SearchResult {
            profile: serde_json::from_str(&profile_json).unwrap(),
            history: vec![RatingHistoryEntry {
                name: "Blitz".to_string(),
                points: vec![[2022, 5, 1, 1500], [2022, 11, 1, 1600], [2023, 5, 1, 1650]],
            }],
        }
    }

    fn typed(text: &str) -> DashboardState {
        let mut state = DashboardState::new();
        for c in text.chars() {
            state.apply(Event::Input(c));
        }
        state
    }

    fn submitted_seq(effect: Option<Effect>) -> u64 {
        match effect {
            Some(Effect::Search { seq, .. }) => seq,
            None => panic!("expected a search effect"),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DashboardState::new();
        assert!(!state.is_loading());
        assert!(state.profile.is_none());
        assert_eq!(state.selected_mode, TimeControl::Blitz);
        assert_eq!(state.time_range, TimeRange::All);
    }

    #[test]
    fn test_input_editing() {
        let mut state = typed("Magnus");
        state.apply(Event::Backspace);
        assert_eq!(state.query, "Magnu");
        state.apply(Event::Input('\n'));
        assert_eq!(state.query, "Magnu");
        state.apply(Event::ClearInput);
        assert!(state.query.is_empty());
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut state = typed("   ");
        assert_eq!(state.apply(Event::Submit), None);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_submit_trims_and_starts_loading() {
        let mut state = typed("  thibault  ");
        let effect = state.apply(Event::Submit);
        assert_eq!(
            effect,
            Some(Effect::Search {
                seq: 1,
                username: "thibault".to_string()
            })
        );
        assert!(state.is_loading());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_submit_while_loading_is_ignored() {
        let mut state = typed("thibault");
        state.apply(Event::Submit);
        assert_eq!(state.apply(Event::Submit), None);
    }

    #[test]
    fn test_successful_search_selects_default_mode() {
        let mut state = typed("Thibault");
        state.selected_mode = TimeControl::Puzzle;
        let seq = submitted_seq(state.apply(Event::Submit));

        state.apply(Event::SearchFinished {
            seq,
            outcome: Ok(result("Thibault", 120)),
        });

        assert!(!state.is_loading());
        assert_eq!(state.searched_username.as_deref(), Some("Thibault"));
        assert_eq!(state.selected_mode, TimeControl::Blitz);
        assert_eq!(state.history.len(), 1);

        let projection = state.projection(0);
        assert_eq!(projection.points.len(), 3);
        let bounds = projection.bounds.unwrap();
        assert_eq!((bounds.domain_low, bounds.domain_high), (1485, 1665));
    }

    #[test]
    fn test_not_found_returns_to_idle_with_banner() {
        let mut state = typed("ghost");
        let seq = submitted_seq(state.apply(Event::Submit));

        state.apply(Event::SearchFinished {
            seq,
            outcome: Err(FetchError::NotFound),
        });

        assert!(!state.is_loading());
        assert!(state.profile.is_none());
        assert!(state.history.is_empty());
        assert_eq!(state.error.as_deref(), Some("User not found"));

        // Still searchable afterwards
        assert!(state.apply(Event::Submit).is_some());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_new_search_clears_previous_profile() {
        let mut state = typed("thibault");
        let seq = submitted_seq(state.apply(Event::Submit));
        state.apply(Event::SearchFinished {
            seq,
            outcome: Ok(result("thibault", 5)),
        });
        assert!(state.profile.is_some());

        state.apply(Event::Submit);
        assert!(state.profile.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_cancelled_search_result_is_discarded() {
        let mut state = typed("thibault");
        let first = submitted_seq(state.apply(Event::Submit));
        state.apply(Event::Cancel);
        assert!(!state.is_loading());

        let second = submitted_seq(state.apply(Event::Submit));
        assert!(second > first);

        // The abandoned search settles last but must not win
        state.apply(Event::SearchFinished {
            seq: second,
            outcome: Ok(result("Second", 10)),
        });
        state.apply(Event::SearchFinished {
            seq: first,
            outcome: Ok(result("First", 10)),
        });
        assert_eq!(state.searched_username.as_deref(), Some("Second"));
    }

    #[test]
    fn test_stale_failure_does_not_clobber_loading() {
        let mut state = typed("thibault");
        let first = submitted_seq(state.apply(Event::Submit));
        state.apply(Event::Cancel);
        state.apply(Event::Submit);

        state.apply(Event::SearchFinished {
            seq: first,
            outcome: Err(FetchError::NotFound),
        });
        assert!(state.is_loading());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_refresh_reuses_last_username() {
        let mut state = DashboardState::new();
        assert_eq!(state.apply(Event::Refresh), None);

        state = typed("thibault");
        let seq = submitted_seq(state.apply(Event::Submit));
        state.apply(Event::SearchFinished {
            seq,
            outcome: Ok(result("Thibault", 1)),
        });
        state.apply(Event::ClearInput);

        assert_eq!(
            state.apply(Event::Refresh),
            Some(Effect::Search {
                seq: 2,
                username: "Thibault".to_string()
            })
        );
    }

    #[test]
    fn test_mode_and_range_selection_need_no_network() {
        let mut state = typed("thibault");
        let seq = submitted_seq(state.apply(Event::Submit));
        state.apply(Event::SearchFinished {
            seq,
            outcome: Ok(result("thibault", 3)),
        });

        assert_eq!(state.apply(Event::SelectMode(TimeControl::Rapid)), None);
        assert_eq!(state.selected_mode, TimeControl::Rapid);
        assert!(state.projection(0).is_empty_series());

        assert_eq!(state.apply(Event::SelectRange(TimeRange::SixMonths)), None);
        assert_eq!(state.time_range, TimeRange::SixMonths);
    }
}
