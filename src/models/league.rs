//! League: the player and match collections, and LeagueError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Version written into every snapshot. Bump when the stored layout changes.
/// - v1: players (with `disabled`) and matches with flattened status
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// No player with this id.
    PlayerNotFound(PlayerId),
    /// No match with this id.
    MatchNotFound(MatchId),
    /// Tied score or missing score; no winner can be determined.
    InvalidResult(String),
    /// Player data failed validation (e.g. empty name).
    InvalidPlayer(String),
    /// Both sides of a match reference the same player.
    SamePlayer,
    /// Disabled players cannot be entered into new matches.
    PlayerDisabled(PlayerId),
    /// Another player already uses this email (case-insensitive).
    DuplicateEmail,
    /// Player still referenced by matches; disable instead of deleting.
    PlayerHasMatches(PlayerId),
    /// Snapshot or lock failure.
    Storage(String),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            LeagueError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            LeagueError::InvalidResult(reason) => write!(f, "Invalid result: {}", reason),
            LeagueError::InvalidPlayer(reason) => write!(f, "Invalid player: {}", reason),
            LeagueError::SamePlayer => write!(f, "Players must be different"),
            LeagueError::PlayerDisabled(_) => write!(f, "Player is disabled"),
            LeagueError::DuplicateEmail => write!(f, "A player with this email already exists"),
            LeagueError::PlayerHasMatches(_) => {
                write!(f, "Player has recorded matches; disable the player instead")
            }
            LeagueError::Storage(reason) => write!(f, "Storage error: {}", reason),
        }
    }
}

impl std::error::Error for LeagueError {}

impl From<std::io::Error> for LeagueError {
    fn from(e: std::io::Error) -> Self {
        LeagueError::Storage(format!("io: {}", e))
    }
}

impl From<serde_json::Error> for LeagueError {
    fn from(e: serde_json::Error) -> Self {
        LeagueError::Storage(format!("json: {}", e))
    }
}

impl From<csv::Error> for LeagueError {
    fn from(e: csv::Error) -> Self {
        LeagueError::Storage(format!("csv: {}", e))
    }
}

/// All players and matches. This is the unit that is locked, mutated and snapshotted as a whole.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    #[serde(default)]
    pub version: u32,
    pub players: Vec<Player>,
    pub matches: Vec<GameMatch>,
}

impl Default for League {
    fn default() -> Self {
        Self::new()
    }
}

impl League {
    pub fn new() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            players: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, LeagueError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(LeagueError::PlayerNotFound(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, LeagueError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(LeagueError::PlayerNotFound(id))
    }

    pub fn game(&self, id: MatchId) -> Result<&GameMatch, LeagueError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(LeagueError::MatchNotFound(id))
    }

    pub fn game_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, LeagueError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(LeagueError::MatchNotFound(id))
    }

    /// Overwrite the stored record with the same id.
    pub(crate) fn replace_player(&mut self, updated: Player) -> Result<(), LeagueError> {
        let slot = self.player_mut(updated.id)?;
        *slot = updated;
        slot.touch();
        Ok(())
    }

    /// True if any other player already uses `email` (case-insensitive).
    pub fn email_taken(&self, email: &str, except: Option<PlayerId>) -> bool {
        self.players.iter().any(|p| {
            Some(p.id) != except
                && p
                    .email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
        })
    }
}
