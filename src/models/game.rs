//! Match (game), its status and final score.

use crate::models::league::LeagueError;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which of the two match slots a player occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }
}

/// Final score of a completed match. A tie is not a valid score.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub player1_score: u32,
    pub player2_score: u32,
}

impl Score {
    /// Validated score: rejects ties because they have no winner.
    pub fn new(player1_score: u32, player2_score: u32) -> Result<Self, LeagueError> {
        if player1_score == player2_score {
            return Err(LeagueError::InvalidResult(format!(
                "A tie ({player1_score}-{player2_score}) is not allowed"
            )));
        }
        Ok(Self {
            player1_score,
            player2_score,
        })
    }

    /// Side with the strictly higher score; `None` for a tie.
    pub fn winner(&self) -> Option<Side> {
        match self.player1_score.cmp(&self.player2_score) {
            std::cmp::Ordering::Greater => Some(Side::Player1),
            std::cmp::Ordering::Less => Some(Side::Player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Points scored by the given side.
    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Player1 => self.player1_score,
            Side::Player2 => self.player2_score,
        }
    }
}

/// Lifecycle of a match. Only `Completed` carries a score, and only completed matches count
/// towards statistics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed(Score),
}

/// A single match between two distinct players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    pub player_1: PlayerId,
    pub player_2: PlayerId,
    pub played_at: DateTime<Utc>,
    #[serde(flatten)]
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameMatch {
    pub fn new(
        player_1: PlayerId,
        player_2: PlayerId,
        status: MatchStatus,
        played_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            player_1,
            player_2,
            played_at,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Score if the match is completed.
    pub fn score(&self) -> Option<Score> {
        match self.status {
            MatchStatus::Completed(score) => Some(score),
            MatchStatus::Scheduled => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.score().is_some()
    }

    /// Which side `player_id` plays on, if they take part in this match.
    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if self.player_1 == player_id {
            Some(Side::Player1)
        } else if self.player_2 == player_id {
            Some(Side::Player2)
        } else {
            None
        }
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.side_of(player_id).is_some()
    }

    pub fn player_on(&self, side: Side) -> PlayerId {
        match side {
            Side::Player1 => self.player_1,
            Side::Player2 => self.player_2,
        }
    }

    /// Winner's id for a completed, non-tied match.
    pub fn winner(&self) -> Option<PlayerId> {
        self.score()
            .and_then(|s| s.winner())
            .map(|side| self.player_on(side))
    }

    /// Bump `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
