//! Player and PlayerStats data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Rating every new player starts with.
pub const DEFAULT_RATING: i32 = 1000;

/// Rating and win/loss counters for a player.
///
/// `matches_played` and `win_rate` are derived from `wins`/`losses` and are recomputed on every
/// write; there is no way to set them on their own. Deserializing ignores any stored derived
/// values and recomputes them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StatsRecord")]
pub struct PlayerStats {
    rating: i32,
    wins: u32,
    losses: u32,
    matches_played: u32,
    win_rate: f64,
    points_scored: u64,
}

/// Persisted form of [`PlayerStats`]: only the fields that are not derived.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsRecord {
    #[serde(default = "default_rating")]
    rating: i32,
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    losses: u32,
    #[serde(default)]
    points_scored: u64,
}

fn default_rating() -> i32 {
    DEFAULT_RATING
}

impl From<StatsRecord> for PlayerStats {
    fn from(r: StatsRecord) -> Self {
        PlayerStats::from_record(r.rating, r.wins, r.losses, r.points_scored)
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::from_record(DEFAULT_RATING, 0, 0, 0)
    }
}

impl PlayerStats {
    /// Build stats from the raw counters; derived fields are computed here.
    pub fn from_record(rating: i32, wins: u32, losses: u32, points_scored: u64) -> Self {
        let mut stats = Self {
            rating,
            wins,
            losses,
            matches_played: 0,
            win_rate: 0.0,
            points_scored,
        };
        stats.refresh_derived();
        stats
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    /// Percentage of completed matches won, 0 when no match has been played.
    pub fn win_rate(&self) -> f64 {
        self.win_rate
    }

    pub fn points_scored(&self) -> u64 {
        self.points_scored
    }

    /// Record a win: one more win, `points` added, rating raised by `rating_gain`.
    pub(crate) fn record_win(&mut self, points: u32, rating_gain: i32) {
        self.wins += 1;
        self.rating += rating_gain;
        self.points_scored += u64::from(points);
        self.refresh_derived();
    }

    /// Record a loss: one more loss, `points` added, rating lowered by `rating_loss`.
    pub(crate) fn record_loss(&mut self, points: u32, rating_loss: i32) {
        self.losses += 1;
        self.rating -= rating_loss;
        self.points_scored += u64::from(points);
        self.refresh_derived();
    }

    fn refresh_derived(&mut self) {
        self.matches_played = self.wins + self.losses;
        self.win_rate = if self.matches_played > 0 {
            100.0 * f64::from(self.wins) / f64::from(self.matches_played)
        } else {
            0.0
        };
    }
}

/// A registered player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Unique (case-insensitive) when present.
    #[serde(default)]
    pub email: Option<String>,
    pub avatar_url: String,
    /// Disabled players keep their history but cannot enter new matches.
    #[serde(default)]
    pub disabled: bool,
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player with the given name and avatar. Stats start at the default rating.
    pub fn new(name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            avatar_url: avatar_url.into(),
            disabled: false,
            stats: PlayerStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
