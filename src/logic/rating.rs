//! Statistics engine: Elo-style rating change plus win/loss/points bookkeeping for one match.
//!
//! A single delta is computed from the winner's expected score and applied to both players
//! (winner gains it, loser loses it), so every match is zero-sum. This differs from textbook
//! Elo, where each side's change comes from its own expected score.

use crate::models::{LeagueError, Player, Score, Side};

/// Maximum rating change per match.
pub const K_FACTOR: f64 = 32.0;

/// Probability (0..1) that a player rated `rating` beats one rated `opponent_rating`.
pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(opponent_rating - rating) / 400.0))
}

/// Rating points that move from loser to winner.
pub fn rating_delta(winner_rating: i32, loser_rating: i32) -> i32 {
    (K_FACTOR * (1.0 - expected_score(winner_rating, loser_rating))).round() as i32
}

/// Apply a completed match to both participants and return their updated records
/// in (player 1, player 2) order.
///
/// The inputs are not modified; the caller stores both results together. Applying the same
/// match twice counts it twice, so callers run this at most once per match and use
/// recomputation for edits and deletions.
pub fn apply(
    score: &Score,
    player_1: &Player,
    player_2: &Player,
) -> Result<(Player, Player), LeagueError> {
    if player_1.id == player_2.id {
        return Err(LeagueError::SamePlayer);
    }
    let winning_side = score.winner().ok_or_else(|| {
        LeagueError::InvalidResult("no winner can be determined from a tied score".into())
    })?;
    let (winner, loser) = match winning_side {
        Side::Player1 => (player_1, player_2),
        Side::Player2 => (player_2, player_1),
    };

    let delta = rating_delta(winner.stats.rating(), loser.stats.rating());

    let mut winner = winner.clone();
    let mut loser = loser.clone();
    winner.stats.record_win(score.points(winning_side), delta);
    loser.stats.record_loss(score.points(winning_side.other()), delta);

    Ok(match winning_side {
        Side::Player1 => (winner, loser),
        Side::Player2 => (loser, winner),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_ratings_split_k_factor() {
        assert_eq!(expected_score(1000, 1000), 0.5);
        assert_eq!(rating_delta(1000, 1000), 16);
    }

    #[test]
    fn expected_scores_are_complementary() {
        let a = expected_score(1200, 1000);
        let b = expected_score(1000, 1200);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(a > 0.5);
    }
}
