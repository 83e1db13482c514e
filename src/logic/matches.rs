//! Recording, editing and deleting matches, and recomputing player statistics from history.

use crate::logic::rating;
use crate::models::{
    GameMatch, League, LeagueError, MatchId, MatchStatus, PlayerId, PlayerStats, Score,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Requested status for a new match. Defaults to completed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Scheduled,
    #[default]
    Completed,
}

/// Body for creating a match.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_score: Option<u32>,
    pub player2_score: Option<u32>,
    /// Defaults to now.
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: StatusKind,
}

/// Body for editing a match. Missing fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchUpdate {
    pub player1_score: Option<u32>,
    pub player2_score: Option<u32>,
    pub played_at: Option<DateTime<Utc>>,
}

fn required_score(player1: Option<u32>, player2: Option<u32>) -> Result<Score, LeagueError> {
    match (player1, player2) {
        (Some(a), Some(b)) => Score::new(a, b),
        _ => Err(LeagueError::InvalidResult(
            "both player scores are required".into(),
        )),
    }
}

/// Store a new match. A completed match runs the statistics engine exactly once; both player
/// records and the match are written only after every check has passed.
pub fn record_match(league: &mut League, new: NewMatch) -> Result<MatchId, LeagueError> {
    if new.player1_id == new.player2_id {
        return Err(LeagueError::SamePlayer);
    }
    let player_1 = league.player(new.player1_id)?;
    let player_2 = league.player(new.player2_id)?;
    for p in [player_1, player_2] {
        if p.disabled {
            return Err(LeagueError::PlayerDisabled(p.id));
        }
    }

    let status = match new.status {
        StatusKind::Scheduled => {
            if new.player1_score.is_some() || new.player2_score.is_some() {
                return Err(LeagueError::InvalidResult(
                    "a scheduled match cannot carry scores".into(),
                ));
            }
            MatchStatus::Scheduled
        }
        StatusKind::Completed => {
            MatchStatus::Completed(required_score(new.player1_score, new.player2_score)?)
        }
    };

    let updated = match status {
        MatchStatus::Completed(score) => Some(rating::apply(&score, player_1, player_2)?),
        MatchStatus::Scheduled => None,
    };

    let game = GameMatch::new(
        new.player1_id,
        new.player2_id,
        status,
        new.played_at.unwrap_or_else(Utc::now),
    );
    let id = game.id;

    if let Some((updated_1, updated_2)) = updated {
        let before = league.player(updated_1.id)?.stats.rating();
        let delta = (updated_1.stats.rating() - before).abs();
        league.replace_player(updated_1)?;
        league.replace_player(updated_2)?;
        log::info!("Recorded match {} (rating delta {})", id, delta);
    } else {
        log::info!("Scheduled match {}", id);
    }
    league.matches.push(game);
    Ok(id)
}

/// Edit a match's scores and/or date.
///
/// - scheduled -> completed: the statistics engine runs once, as for a new match, and both
///   players must still be enabled
/// - completed with a changed score: wins, losses and points of both players are recomputed
///   from their history. Ratings are not: if the edit flips the winner, both players keep the
///   rating change from the original result
/// - date only: no statistics change
pub fn update_match(
    league: &mut League,
    match_id: MatchId,
    update: MatchUpdate,
) -> Result<(), LeagueError> {
    let current = league.game(match_id)?.clone();

    let next_status = match (update.player1_score, update.player2_score, current.status) {
        (None, None, status) => status,
        (p1, p2, MatchStatus::Completed(old)) => MatchStatus::Completed(Score::new(
            p1.unwrap_or(old.player1_score),
            p2.unwrap_or(old.player2_score),
        )?),
        (p1, p2, MatchStatus::Scheduled) => MatchStatus::Completed(required_score(p1, p2)?),
    };

    match (current.status, next_status) {
        (MatchStatus::Scheduled, MatchStatus::Completed(score)) => {
            let player_1 = league.player(current.player_1)?;
            let player_2 = league.player(current.player_2)?;
            for p in [player_1, player_2] {
                if p.disabled {
                    return Err(LeagueError::PlayerDisabled(p.id));
                }
            }
            let (updated_1, updated_2) = rating::apply(&score, player_1, player_2)?;
            league.replace_player(updated_1)?;
            league.replace_player(updated_2)?;
            log::info!("Completed scheduled match {}", match_id);
        }
        (MatchStatus::Completed(old), MatchStatus::Completed(new)) if old != new => {
            // Both must exist before the match is touched.
            league.player(current.player_1)?;
            league.player(current.player_2)?;
            set_match(league, match_id, next_status, update.played_at)?;
            recompute_player_stats(league, current.player_1)?;
            recompute_player_stats(league, current.player_2)?;
            return Ok(());
        }
        _ => {}
    }

    set_match(league, match_id, next_status, update.played_at)
}

fn set_match(
    league: &mut League,
    match_id: MatchId,
    status: MatchStatus,
    played_at: Option<DateTime<Utc>>,
) -> Result<(), LeagueError> {
    let game = league.game_mut(match_id)?;
    game.status = status;
    if let Some(at) = played_at {
        game.played_at = at;
    }
    game.touch();
    Ok(())
}

/// Delete a match. Players are kept; if the match counted towards statistics, both players are
/// recomputed from their remaining matches.
pub fn delete_match(league: &mut League, match_id: MatchId) -> Result<GameMatch, LeagueError> {
    let idx = league
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(LeagueError::MatchNotFound(match_id))?;
    let game = &league.matches[idx];
    league.player(game.player_1)?;
    league.player(game.player_2)?;

    let removed = league.matches.remove(idx);
    if removed.is_completed() {
        recompute_player_stats(league, removed.player_1)?;
        recompute_player_stats(league, removed.player_2)?;
    }
    log::info!("Deleted match {}", match_id);
    Ok(removed)
}

/// Recount a player's wins, losses and points from every completed match they played.
///
/// Rating is kept as is: it depends on the opponents' ratings at the time of each match and is
/// not replayed.
pub fn recompute_player_stats(league: &mut League, player_id: PlayerId) -> Result<(), LeagueError> {
    let (wins, losses, points) = league
        .matches
        .iter()
        .filter_map(|m| Some((m.side_of(player_id)?, m.score()?)))
        .fold((0u32, 0u32, 0u64), |(w, l, pts), (side, score)| {
            match score.winner() {
                Some(winner) if winner == side => (w + 1, l, pts + u64::from(score.points(side))),
                Some(_) => (w, l + 1, pts + u64::from(score.points(side))),
                None => (w, l, pts),
            }
        });

    let player = league.player_mut(player_id)?;
    player.stats = PlayerStats::from_record(player.stats.rating(), wins, losses, points);
    player.touch();
    log::debug!(
        "Recomputed stats for {}: {} wins, {} losses",
        player_id,
        wins,
        losses
    );
    Ok(())
}
