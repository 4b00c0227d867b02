//! Scoring and termination predicates.

use trashdroids_core::constants::ASTEROID_YIELD_PER_LARGE;
use trashdroids_core::enums::MatchResult;

/// Asteroids to destroy to win single player: the given fraction of the
/// full yield of `asteroid_count` Large asteroids, rounded down.
pub fn target_score(asteroid_count: u32, pct_to_destroy: f64) -> u32 {
    (f64::from(ASTEROID_YIELD_PER_LARGE) * f64::from(asteroid_count) * pct_to_destroy).floor() as u32
}

/// Win is checked before Fail, so scoring the last point on the tick the
/// last life is lost still wins.
pub fn single_player_outcome(score: u32, target: u32, lives: u32) -> Option<MatchResult> {
    if score >= target {
        Some(MatchResult::SinglePlayerWin)
    } else if lives == 0 {
        Some(MatchResult::SinglePlayerFail)
    } else {
        None
    }
}

/// Player two's win condition is checked first, so a double knockout on
/// one tick goes to player two.
pub fn versus_outcome(p1_lives: u32, p2_lives: u32) -> Option<MatchResult> {
    if p1_lives == 0 {
        Some(MatchResult::PlayerTwoWins)
    } else if p2_lives == 0 {
        Some(MatchResult::PlayerOneWins)
    } else {
        None
    }
}
