//! Table-tennis league tracker: library with models, statistics engine, storage and HTTP API.

pub mod api;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    add_player, apply, delete_match, delete_player, export_matches_csv, expected_score,
    leaderboard, list_matches, list_players, match_view, matches_for_player, player_profile,
    rating_delta, recompute_player_stats, record_match, update_match, update_player, MatchUpdate,
    MatchView, NewMatch, NewPlayer, PlayerProfile, PlayerSummary, PlayerUpdate, StatusKind,
    K_FACTOR,
};
pub use models::{
    GameMatch, League, LeagueError, MatchId, MatchStatus, Player, PlayerId, PlayerStats, Score,
    Side, DEFAULT_RATING,
};
pub use store::LeagueStore;
