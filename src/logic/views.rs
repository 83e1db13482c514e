//! Read models: populated matches, sorted player lists, leaderboard, profile and CSV export.

use crate::models::{GameMatch, League, LeagueError, MatchId, MatchStatus, Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Number of players on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;
/// Number of matches shown on a player profile.
pub const RECENT_MATCHES: usize = 5;

/// Player details embedded in a match.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub avatar_url: String,
}

impl From<&Player> for PlayerSummary {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            avatar_url: p.avatar_url.clone(),
        }
    }
}

/// A match with both players populated.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: MatchId,
    pub player1: PlayerSummary,
    pub player2: PlayerSummary,
    pub played_at: DateTime<Utc>,
    #[serde(flatten)]
    pub status: MatchStatus,
    pub winner: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Player page: the player, recent form and score statistics over completed matches.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub player: Player,
    pub recent_matches: Vec<MatchView>,
    /// Win rate rounded to a whole percentage.
    pub win_rate: u32,
    /// Average points per completed match, one decimal.
    pub average_score: f64,
    pub highest_score: u32,
    pub longest_streak: u32,
}

pub fn populate(league: &League, game: &GameMatch) -> Result<MatchView, LeagueError> {
    Ok(MatchView {
        id: game.id,
        player1: league.player(game.player_1)?.into(),
        player2: league.player(game.player_2)?.into(),
        played_at: game.played_at,
        status: game.status,
        winner: game.winner(),
        created_at: game.created_at,
        updated_at: game.updated_at,
    })
}

pub fn match_view(league: &League, match_id: MatchId) -> Result<MatchView, LeagueError> {
    populate(league, league.game(match_id)?)
}

fn newest_first<'a>(games: impl Iterator<Item = &'a GameMatch>) -> Vec<&'a GameMatch> {
    let mut games: Vec<_> = games.collect();
    games.sort_by(|a, b| b.played_at.cmp(&a.played_at));
    games
}

/// All matches, most recently played first.
pub fn list_matches(league: &League) -> Result<Vec<MatchView>, LeagueError> {
    newest_first(league.matches.iter())
        .into_iter()
        .map(|m| populate(league, m))
        .collect()
}

/// Matches involving one player, most recently played first.
pub fn matches_for_player(
    league: &League,
    player_id: PlayerId,
) -> Result<Vec<MatchView>, LeagueError> {
    league.player(player_id)?;
    newest_first(league.matches.iter().filter(|m| m.involves(player_id)))
        .into_iter()
        .map(|m| populate(league, m))
        .collect()
}

fn by_win_rate(a: &Player, b: &Player) -> Ordering {
    b.stats
        .win_rate()
        .total_cmp(&a.stats.win_rate())
        .then_with(|| b.stats.wins().cmp(&a.stats.wins()))
}

/// Players by win rate then wins, optionally filtered by a case-insensitive name substring.
pub fn list_players(league: &League, search: Option<&str>) -> Vec<Player> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let mut players: Vec<Player> = league
        .players
        .iter()
        .filter(|p| match &needle {
            Some(n) => p.name.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    players.sort_by(by_win_rate);
    players
}

/// Top players by win rate, wins, then rating.
pub fn leaderboard(league: &League) -> Vec<Player> {
    let mut players = league.players.clone();
    players.sort_by(|a, b| {
        by_win_rate(a, b).then_with(|| b.stats.rating().cmp(&a.stats.rating()))
    });
    players.truncate(LEADERBOARD_SIZE);
    players
}

pub fn player_profile(league: &League, player_id: PlayerId) -> Result<PlayerProfile, LeagueError> {
    let player = league.player(player_id)?.clone();
    let played = newest_first(league.matches.iter().filter(|m| m.involves(player_id)));

    let recent_matches = played
        .iter()
        .take(RECENT_MATCHES)
        .map(|m| populate(league, m))
        .collect::<Result<Vec<_>, _>>()?;

    // (own points, won) per completed match, oldest first for the streak.
    let results: Vec<(u32, bool)> = played
        .iter()
        .rev()
        .filter_map(|m| {
            let side = m.side_of(player_id)?;
            let score = m.score()?;
            Some((score.points(side), score.winner() == Some(side)))
        })
        .collect();

    let total: u64 = results.iter().map(|(pts, _)| u64::from(*pts)).sum();
    let average_score = if results.is_empty() {
        0.0
    } else {
        (total as f64 / results.len() as f64 * 10.0).round() / 10.0
    };
    let highest_score = results.iter().map(|(pts, _)| *pts).max().unwrap_or(0);

    let mut current = 0;
    let mut longest_streak = 0;
    for (_, won) in &results {
        if *won {
            current += 1;
            longest_streak = longest_streak.max(current);
        } else {
            current = 0;
        }
    }

    Ok(PlayerProfile {
        win_rate: player.stats.win_rate().round() as u32,
        player,
        recent_matches,
        average_score,
        highest_score,
        longest_streak,
    })
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: MatchId,
    played_at: String,
    status: &'static str,
    player1: &'a str,
    player1_score: Option<u32>,
    player2: &'a str,
    player2_score: Option<u32>,
    winner: Option<&'a str>,
}

const CSV_HEADER: [&str; 8] = [
    "id",
    "played_at",
    "status",
    "player1",
    "player1_score",
    "player2",
    "player2_score",
    "winner",
];

/// Match history as CSV, most recently played first. The header is written even when empty.
pub fn export_matches_csv(league: &League) -> Result<String, LeagueError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for m in newest_first(league.matches.iter()) {
        let p1 = league.player(m.player_1)?;
        let p2 = league.player(m.player_2)?;
        let score = m.score();
        let winner = m
            .winner()
            .map(|id| if id == p1.id { p1.name.as_str() } else { p2.name.as_str() });
        wtr.serialize(CsvRow {
            id: m.id,
            played_at: m.played_at.to_rfc3339(),
            status: if score.is_some() { "completed" } else { "scheduled" },
            player1: &p1.name,
            player1_score: score.map(|s| s.player1_score),
            player2: &p2.name,
            player2_score: score.map(|s| s.player2_score),
            winner,
        })?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| LeagueError::Storage(format!("csv: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| LeagueError::Storage(format!("csv: {}", e)))
}
