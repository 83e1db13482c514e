//! League business logic: statistics engine, match recording, players and read models.

mod matches;
mod players;
mod rating;
mod views;

pub use matches::{
    delete_match, recompute_player_stats, record_match, update_match, MatchUpdate, NewMatch,
    StatusKind,
};
pub use players::{add_player, default_avatar_url, delete_player, update_player, NewPlayer, PlayerUpdate};
pub use rating::{apply, expected_score, rating_delta, K_FACTOR};
pub use views::{
    export_matches_csv, leaderboard, list_matches, list_players, match_view, matches_for_player,
    player_profile, populate, MatchView, PlayerProfile, PlayerSummary, LEADERBOARD_SIZE,
    RECENT_MATCHES,
};
