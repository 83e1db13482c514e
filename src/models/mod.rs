//! Data structures for the league: players, matches, and the collections holding them.

mod game;
mod league;
mod player;

pub use game::{GameMatch, MatchId, MatchStatus, Score, Side};
pub use league::{League, LeagueError, SNAPSHOT_VERSION};
pub use player::{Player, PlayerId, PlayerStats, DEFAULT_RATING};
