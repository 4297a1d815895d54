//! Default mode selection for a freshly loaded profile.

use super::models::{Profile, TimeControl};

/// Mode shown when no mode has any games
pub const FALLBACK_MODE: TimeControl = TimeControl::Blitz;

/// Pick the mode with the most games, walking modes in priority order.
///
/// Only a strictly greater count replaces the current pick, so ties go to the
/// earlier mode and a profile with no games at all stays on blitz.
pub fn default_mode(profile: &Profile) -> TimeControl {
    let mut best = FALLBACK_MODE;
    let mut max_games = 0;
    for mode in TimeControl::ALL {
        let games = profile.games_in(mode);
        if games > max_games {
            max_games = games;
            best = mode;
        }
    }
    best
}
